use crate::ac::{
    employee::Employee,
    session::Session,
};
use super::Agent;

impl Agent {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Agent::Anonymous => None,
            Agent::Session(session) => Some(session),
        }
    }

    pub fn employee(&self) -> Option<&Employee> {
        self.session().map(|session| &session.employee)
    }
}

impl From<Session> for Agent {
    fn from(session: Session) -> Agent {
        Agent::Session(session)
    }
}

impl From<Option<Session>> for Agent {
    fn from(session: Option<Session>) -> Agent {
        session.map(Agent::Session)
            .unwrap_or_default()
    }
}

impl From<&Agent> for Option<i64> {
    fn from(agent: &Agent) -> Self {
        agent.employee().map(|employee| employee.id)
    }
}

#[cfg(test)]
mod test {
    use crate::ac::{
        employee::Employee,
        role::Role,
        session::{Session, SessionToken},
    };
    use super::*;

    #[test]
    fn anonymous() {
        let agent = Agent::default();
        assert_eq!(agent.session(), None);
        assert_eq!(Option::<i64>::from(&agent), None);
    }

    #[test]
    fn session() {
        let agent: Agent = Session {
            token: SessionToken::default(),
            employee: Employee {
                id: 3,
                name: "Ruth".to_string(),
                role: Role::Manager,
                created_ts: 1234567890,
            },
            origin: "localhost".to_string(),
            created_ts: 1234567890,
            last_active_ts: 1234567890,
        }.into();
        assert_eq!(agent.employee().map(|e| e.role), Some(Role::Manager));
        assert_eq!(Option::<i64>::from(&agent), Some(3));
        assert_eq!(agent.employee().map(|e| e.name.as_str()), Some("Ruth"));
    }
}
