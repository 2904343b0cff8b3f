// src/backend/adapter/testing.rs
// In-memory stand-in for the patient-records and access-control services.

use crate::adapter::connection::Connection;
use crate::config::GatewayConfig;
use crate::models::{RecordId, RemoteRecord};
use candid::Principal;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

pub fn test_config() -> GatewayConfig {
    GatewayConfig::new(
        Principal::from_text("rrkah-fqaaa-aaaaa-aaaaq-cai").unwrap(),
        Principal::from_text("ryjl3-tyaaa-aaaaa-aaaba-cai").unwrap(),
    )
}

pub struct FakeBackend {
    principal: Principal,
    records_canister: Principal,
    access_canister: Principal,
    records: RefCell<Vec<RemoteRecord>>,
    grants: RefCell<HashMap<RecordId, BTreeSet<String>>>,
    failures: RefCell<HashMap<String, String>>,
    calls: RefCell<Vec<String>>,
}

impl FakeBackend {
    pub fn new(config: &GatewayConfig) -> Self {
        Self::with_principal(config, Principal::from_slice(&[0xAB; 29]))
    }

    pub fn anonymous(config: &GatewayConfig) -> Self {
        Self::with_principal(config, Principal::anonymous())
    }

    fn with_principal(config: &GatewayConfig, principal: Principal) -> Self {
        FakeBackend {
            principal,
            records_canister: config.patient_records_canister,
            access_canister: config.access_control_canister,
            records: RefCell::new(Vec::new()),
            grants: RefCell::new(HashMap::new()),
            failures: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Makes every later call to `method` reject with `message`.
    pub fn fail_method(&self, method: &str, message: &str) {
        self.failures
            .borrow_mut()
            .insert(method.to_string(), message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn grantees(&self, record_id: RecordId) -> Vec<String> {
        self.grants
            .borrow()
            .get(&record_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn handle(&self, canister: Principal, method: &str, args: &[u8]) -> Result<Vec<u8>, String> {
        self.calls.borrow_mut().push(method.to_string());
        if let Some(message) = self.failures.borrow().get(method) {
            return Err(message.clone());
        }
        let codec = |e: candid::Error| e.to_string();

        match method {
            "add_record" | "get_my_records" | "get_record_by_id" if canister != self.records_canister => {
                Err(format!("{} sent to the wrong canister {}", method, canister))
            }
            "grant_access" | "revoke_access" | "has_access" | "get_grantees" if canister != self.access_canister => {
                Err(format!("{} sent to the wrong canister {}", method, canister))
            }
            "add_record" => {
                let (name, record_type, date, size, data, notes, uploaded_at): (
                    String,
                    String,
                    String,
                    String,
                    String,
                    String,
                    String,
                ) = candid::decode_args(args).map_err(codec)?;
                let mut records = self.records.borrow_mut();
                let id = records.len() as RecordId + 1;
                records.push(RemoteRecord {
                    id,
                    owner: self.principal.to_text(),
                    name,
                    record_type,
                    date,
                    size,
                    data,
                    notes,
                    uploaded_at,
                });
                candid::encode_one(id).map_err(codec)
            }
            "get_my_records" => {
                let owner = self.principal.to_text();
                let mine: Vec<RemoteRecord> = self
                    .records
                    .borrow()
                    .iter()
                    .filter(|r| r.owner == owner)
                    .cloned()
                    .collect();
                candid::encode_one(mine).map_err(codec)
            }
            "get_record_by_id" => {
                let id: RecordId = candid::decode_one(args).map_err(codec)?;
                let found = self.records.borrow().iter().find(|r| r.id == id).cloned();
                candid::encode_one(found).map_err(codec)
            }
            "grant_access" => {
                let (id, grantee): (RecordId, String) = candid::decode_args(args).map_err(codec)?;
                self.grants.borrow_mut().entry(id).or_default().insert(grantee);
                candid::encode_args(()).map_err(codec)
            }
            "revoke_access" => {
                let (id, grantee): (RecordId, String) = candid::decode_args(args).map_err(codec)?;
                if let Some(set) = self.grants.borrow_mut().get_mut(&id) {
                    set.remove(&grantee);
                }
                candid::encode_args(()).map_err(codec)
            }
            "has_access" => {
                let (id, principal): (RecordId, String) = candid::decode_args(args).map_err(codec)?;
                let granted = self
                    .grants
                    .borrow()
                    .get(&id)
                    .is_some_and(|set| set.contains(&principal));
                candid::encode_one(granted).map_err(codec)
            }
            "get_grantees" => {
                let id: RecordId = candid::decode_one(args).map_err(codec)?;
                candid::encode_one(self.grantees(id)).map_err(codec)
            }
            other => Err(format!("Canister has no method '{}'", other)),
        }
    }
}

impl Connection for FakeBackend {
    fn principal(&self) -> Principal {
        self.principal
    }

    async fn query(&self, canister: Principal, method: &str, args: Vec<u8>) -> Result<Vec<u8>, String> {
        self.handle(canister, method, &args)
    }

    async fn update(&self, canister: Principal, method: &str, args: Vec<u8>) -> Result<Vec<u8>, String> {
        self.handle(canister, method, &args)
    }
}
