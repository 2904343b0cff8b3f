// src/backend/adapter/connection.rs
use candid::Principal;

/// Authenticated transport to the external services. Arguments and replies
/// are candid-encoded bytes; failures carry the transport or remote text.
#[allow(async_fn_in_trait)]
pub trait Connection {
    /// Identity the services see as the caller.
    fn principal(&self) -> Principal;

    async fn query(&self, canister: Principal, method: &str, args: Vec<u8>) -> Result<Vec<u8>, String>;

    async fn update(&self, canister: Principal, method: &str, args: Vec<u8>) -> Result<Vec<u8>, String>;

    fn is_authenticated(&self) -> bool {
        self.principal() != Principal::anonymous()
    }
}

/// Connection used when this crate runs inside a canister: calls go out as
/// inter-canister calls and the services see this canister's id as the caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct InterCanisterConnection;

impl InterCanisterConnection {
    async fn call(canister: Principal, method: &str, args: Vec<u8>) -> Result<Vec<u8>, String> {
        ic_cdk::api::call::call_raw(canister, method, args, 0)
            .await
            .map_err(|(code, msg)| format!("{:?}: {}", code, msg))
    }
}

impl Connection for InterCanisterConnection {
    fn principal(&self) -> Principal {
        ic_cdk::api::id()
    }

    // Inter-canister calls have no query variant; both kinds go through call_raw.
    async fn query(&self, canister: Principal, method: &str, args: Vec<u8>) -> Result<Vec<u8>, String> {
        Self::call(canister, method, args).await
    }

    async fn update(&self, canister: Principal, method: &str, args: Vec<u8>) -> Result<Vec<u8>, String> {
        Self::call(canister, method, args).await
    }
}
