use crate::db::models::{Customer, CustomerId, DbUser, NewCustomer};
use crate::db::sqlite::CrmStorage;
use crate::error::CrmError;

use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use tracing::{debug, info, warn};

/// Messages handled by the storage actor. Each one runs exactly one statement.
#[derive(Debug)]
pub enum DbActorMessage {
    InsertUser(String, String, RpcReplyPort<Result<bool, CrmError>>),
    GetUser(String, RpcReplyPort<Result<Option<DbUser>, CrmError>>),
    InsertCustomer(NewCustomer, RpcReplyPort<Result<CustomerId, CrmError>>),
    ListCustomers(RpcReplyPort<Result<Vec<Customer>, CrmError>>),
    SearchCustomers(String, RpcReplyPort<Result<Vec<Customer>, CrmError>>),
}

/// Handle for talking to the storage actor. Cheap to clone.
#[derive(Clone)]
pub struct DbHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbHandle {
    pub async fn insert_user(
        &self,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<bool, CrmError> {
        ractor::call!(
            self.actor,
            DbActorMessage::InsertUser,
            username.into(),
            password_hash.into()
        )
        .map_err(|e| CrmError::ActorError(format!("InsertUser RPC failed: {e}")))?
    }

    pub async fn get_user(&self, username: impl Into<String>) -> Result<Option<DbUser>, CrmError> {
        ractor::call!(self.actor, DbActorMessage::GetUser, username.into())
            .map_err(|e| CrmError::ActorError(format!("GetUser RPC failed: {e}")))?
    }

    pub async fn insert_customer(&self, customer: NewCustomer) -> Result<CustomerId, CrmError> {
        ractor::call!(self.actor, DbActorMessage::InsertCustomer, customer)
            .map_err(|e| CrmError::ActorError(format!("InsertCustomer RPC failed: {e}")))?
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, CrmError> {
        ractor::call!(self.actor, DbActorMessage::ListCustomers)
            .map_err(|e| CrmError::ActorError(format!("ListCustomers RPC failed: {e}")))?
    }

    pub async fn search_customers(
        &self,
        term: impl Into<String>,
    ) -> Result<Vec<Customer>, CrmError> {
        ractor::call!(self.actor, DbActorMessage::SearchCustomers, term.into())
            .map_err(|e| CrmError::ActorError(format!("SearchCustomers RPC failed: {e}")))?
    }
}

struct DbActorState {
    storage: CrmStorage,
}

/// Sole owner of the database connection; the mailbox serializes statements.
struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let storage = CrmStorage::connect(&database_url)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("DB init failed: {e}")))?;

        info!(database_url = %database_url, "DbActor started; schema ready");
        Ok(DbActorState { storage })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let storage = &state.storage;
        match message {
            DbActorMessage::InsertUser(username, password_hash, rp) => {
                let res = storage.insert_user(&username, &password_hash).await;
                debug!(username = %username, inserted = ?res.as_ref().ok(), "insert user");
                reply(rp, res, "InsertUser");
            }
            DbActorMessage::GetUser(username, rp) => {
                let res = storage.get_user(&username).await;
                reply(rp, res, "GetUser");
            }
            DbActorMessage::InsertCustomer(customer, rp) => {
                let res = storage.insert_customer(&customer).await;
                debug!(id = ?res.as_ref().ok(), "insert customer");
                reply(rp, res, "InsertCustomer");
            }
            DbActorMessage::ListCustomers(rp) => {
                let res = storage.list_customers().await;
                reply(rp, res, "ListCustomers");
            }
            DbActorMessage::SearchCustomers(term, rp) => {
                let res = storage.search_customers(&term).await;
                debug!(term = %term, hits = ?res.as_ref().map(Vec::len).ok(), "search customers");
                reply(rp, res, "SearchCustomers");
            }
        }
        Ok(())
    }
}

fn reply<T>(rp: RpcReplyPort<Result<T, CrmError>>, res: Result<T, CrmError>, op: &str)
where
    T: Send + 'static,
{
    if let Err(e) = &res {
        warn!(op, error = %e, "statement failed");
    }
    if rp.send(res).is_err() {
        debug!(op, "caller dropped before reply");
    }
}

/// Spawn the storage actor for `database_url` and return a handle.
pub async fn spawn(database_url: &str) -> Result<DbHandle, CrmError> {
    let (actor, _jh) = Actor::spawn(Some("DbActor".to_string()), DbActor, database_url.to_string())
        .await
        .map_err(|e| CrmError::ActorError(format!("failed to spawn DbActor: {e}")))?;
    Ok(DbHandle { actor })
}
