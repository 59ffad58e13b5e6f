use clap::Parser;
use std::sync::Arc;
use studiodb_sqlite::SqliteBackend;
use studioapp::{
    conf::{
        Cli,
        Commands,
        ServeArgs,
    },
    employee,
    server::{
        self,
        AppContext,
    },
};
use studiostore::{
    audit::LogAuditSink,
    Builder,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    stderrlog::new()
        .module(module_path!())
        .module("studiostore")
        .module("studiodb_sqlite")
        .module("studiorender")
        .module("studio::audit")
        .verbosity((args.verbose as usize) + 1)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let backend = SqliteBackend::from_url(&args.studio_db_url).await?;
    match args.command {
        Commands::Serve(serve_args) => serve(backend, serve_args).await?,
        Commands::Employee { cmd } => println!("{}", employee::run(&backend, cmd).await?),
    }
    Ok(())
}

async fn serve(backend: SqliteBackend, args: ServeArgs) -> anyhow::Result<()> {
    let store = Builder::new()
        .record_platform(backend.clone())
        .audit_sink(LogAuditSink)
        .build();
    store.refresh().await?;
    let ctx = AppContext {
        store,
        identity: Arc::new(backend),
        pdf_options: Arc::new(args.pdf_options()),
        attachments: args.attachments(),
    };
    server::serve(&args.listen, server::router(ctx)).await
}
