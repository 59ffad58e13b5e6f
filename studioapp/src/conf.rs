use clap::{
    ArgAction,
    Args,
    Parser,
    Subcommand,
};
use std::{
    path::PathBuf,
    sync::Arc,
};
use studiocore::ac::{
    session::SessionToken,
    Role,
};
use studiorender::pdf::{
    AttachmentSource,
    Color,
    DirAttachmentSource,
    NoAttachments,
    PdfOptions,
    DEFAULT_FIRM_CONTACT,
};

#[derive(Debug, Parser)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    #[clap(long, value_name = "STUDIO_DB_URL", env = "STUDIO_DB_URL")]
    pub studio_db_url: String,
    #[clap(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serves the record store over HTTP
    Serve(ServeArgs),
    #[command(arg_required_else_help = true)]
    Employee {
        #[command(subcommand)]
        cmd: EmployeeCmd,
    },
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    #[clap(long, value_name = "STUDIO_LISTEN", env = "STUDIO_LISTEN", default_value = "127.0.0.1:8000")]
    pub listen: String,
    /// Printed in the footer of every PDF page
    #[clap(long, value_name = "STUDIO_FIRM_CONTACT", env = "STUDIO_FIRM_CONTACT", default_value = DEFAULT_FIRM_CONTACT)]
    pub firm_contact: String,
    #[clap(long, value_name = "STUDIO_BRAND_COLOR", env = "STUDIO_BRAND_COLOR", default_value = "#1f3a5f")]
    pub brand_color: Color,
    /// Directory holding attachments referenced by relative urls
    #[clap(long, value_name = "STUDIO_ATTACHMENT_ROOT", env = "STUDIO_ATTACHMENT_ROOT")]
    pub attachment_root: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum EmployeeCmd {
    #[command(arg_required_else_help = true)]
    /// Adds an employee and reports the assigned id
    Add {
        name: String,
        role: Role,
    },
    #[command(arg_required_else_help = true)]
    /// Opens a session for the employee and prints its bearer token
    Login {
        id: i64,
        #[clap(long, default_value = "cli")]
        origin: String,
    },
    #[command(arg_required_else_help = true)]
    /// Changes the role of an existing employee
    Role {
        id: i64,
        role: Role,
    },
    #[command(arg_required_else_help = true)]
    /// Ends the session identified by the bearer token
    Logout {
        token: SessionToken,
    },
}

impl ServeArgs {
    pub fn pdf_options(&self) -> PdfOptions {
        PdfOptions {
            firm_contact: self.firm_contact.clone(),
            brand: self.brand_color,
        }
    }

    pub fn attachments(&self) -> Arc<dyn AttachmentSource> {
        match &self.attachment_root {
            Some(root) => Arc::new(DirAttachmentSource::new(root)),
            None => Arc::new(NoAttachments),
        }
    }
}
