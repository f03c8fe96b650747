//! In-memory doubles for the store and the payment processor.

use crate::database::{DeleteOutcome, DocumentStore, InsertOutcome, UpdateOutcome};
use crate::services::payment_service::{PaymentIntent, PaymentProcessor};
use crate::services::TokenService;
use crate::state::AppState;
use crate::utils::AppError;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const TEST_SECRET: &str = "test-secret";

/// Understands equality filters, `$in`, `$set`, `$match` and a null-keyed `$group`/`$sum`.
#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
}

impl InMemoryStore {
    /// Inserts directly, bypassing the call log
    pub fn seed(&self, collection: &str, mut document: Document) -> ObjectId {
        let id = match document.get("_id") {
            Some(Bson::ObjectId(id)) => *id,
            _ => {
                let id = ObjectId::new();
                document.insert("_id", id);
                id
            }
        };
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(document);
        id
    }

    pub fn fail_on(&self, op: &str, collection: &str) {
        self.failing.lock().unwrap().insert(format!("{}:{}", op, collection));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, op: &str, collection: &str) -> Result<(), AppError> {
        let key = format!("{}:{}", op, collection);
        self.calls.lock().unwrap().push(key.clone());
        if self.failing.lock().unwrap().contains(&key) {
            return Err(AppError::DatabaseError(format!("injected failure on {}", key)));
        }
        Ok(())
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, condition)| {
        let value = document.get(key);
        match condition {
            Bson::Document(ops) if ops.keys().any(|k| k.starts_with('$')) => {
                ops.iter().all(|(op, arg)| match (op.as_str(), arg) {
                    ("$in", Bson::Array(options)) => value.map_or(false, |v| options.contains(v)),
                    ("$eq", expected) => value == Some(expected),
                    _ => false,
                })
            }
            expected => value == Some(expected),
        }
    })
}

fn numeric(value: Option<&Bson>) -> f64 {
    match value {
        Some(Bson::Double(v)) => *v,
        Some(Bson::Int32(v)) => f64::from(*v),
        Some(Bson::Int64(v)) => *v as f64,
        _ => 0.0,
    }
}

fn group(documents: &[Document], group_spec: &Document) -> Document {
    let mut row = Document::new();
    row.insert("_id", group_spec.get("_id").cloned().unwrap_or(Bson::Null));
    for (name, accumulator) in group_spec.iter().filter(|(k, _)| k.as_str() != "_id") {
        let total = match accumulator {
            Bson::Document(acc) => match acc.get("$sum") {
                Some(Bson::String(path)) => {
                    let field = path.trim_start_matches('$');
                    documents.iter().map(|d| numeric(d.get(field))).sum()
                }
                Some(constant) => numeric(Some(constant)) * documents.len() as f64,
                None => 0.0,
            },
            _ => 0.0,
        };
        row.insert(name.clone(), total);
    }
    row
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>, AppError> {
        self.record("find", collection)?;
        Ok(self
            .documents(collection)
            .into_iter()
            .filter(|d| matches(d, &filter))
            .collect())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, AppError> {
        self.record("find_one", collection)?;
        Ok(self.documents(collection).into_iter().find(|d| matches(d, &filter)))
    }

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<InsertOutcome, AppError> {
        self.record("insert_one", collection)?;
        let id = self.seed(collection, document);
        Ok(InsertOutcome { acknowledged: true, inserted_id: id.to_hex() })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateOutcome, AppError> {
        self.record("update_one", collection)?;
        let mut collections = self.collections.lock().unwrap();
        let documents = collections.entry(collection.to_string()).or_default();

        let mut outcome = UpdateOutcome {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: None,
        };

        if let Some(target) = documents.iter_mut().find(|d| matches(d, &filter)) {
            outcome.matched_count = 1;
            if let Ok(set) = update.get_document("$set") {
                let mut changed = false;
                for (key, value) in set {
                    if target.get(key) != Some(value) {
                        target.insert(key.clone(), value.clone());
                        changed = true;
                    }
                }
                if changed {
                    outcome.modified_count = 1;
                }
            }
        }

        Ok(outcome)
    }

    async fn delete_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<DeleteOutcome, AppError> {
        self.record("delete_one", collection)?;
        let mut collections = self.collections.lock().unwrap();
        let documents = collections.entry(collection.to_string()).or_default();

        let deleted_count = match documents.iter().position(|d| matches(d, &filter)) {
            Some(index) => {
                documents.remove(index);
                1
            }
            None => 0,
        };

        Ok(DeleteOutcome { acknowledged: true, deleted_count })
    }

    async fn delete_many(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<DeleteOutcome, AppError> {
        self.record("delete_many", collection)?;
        let mut collections = self.collections.lock().unwrap();
        let documents = collections.entry(collection.to_string()).or_default();

        let before = documents.len();
        documents.retain(|d| !matches(d, &filter));

        Ok(DeleteOutcome {
            acknowledged: true,
            deleted_count: (before - documents.len()) as u64,
        })
    }

    async fn estimated_count(&self, collection: &str) -> Result<u64, AppError> {
        self.record("estimated_count", collection)?;
        Ok(self.documents(collection).len() as u64)
    }

    async fn aggregate(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> Result<Vec<Document>, AppError> {
        self.record("aggregate", collection)?;
        let mut documents = self.documents(collection);

        for stage in &pipeline {
            if let Ok(filter) = stage.get_document("$match") {
                documents.retain(|d| matches(d, filter));
            } else if let Ok(group_spec) = stage.get_document("$group") {
                // A group over nothing yields no rows, as the real store does
                documents = if documents.is_empty() {
                    Vec::new()
                } else {
                    vec![group(&documents, group_spec)]
                };
            }
        }

        Ok(documents)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntentRequest {
    pub amount: i64,
    pub currency: String,
    pub methods: Vec<String>,
}

#[derive(Default)]
pub struct RecordingProcessor {
    requests: Mutex<Vec<IntentRequest>>,
    fail: bool,
}

impl RecordingProcessor {
    pub fn failing() -> Self {
        Self { requests: Mutex::new(Vec::new()), fail: true }
    }

    pub fn requests(&self) -> Vec<IntentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProcessor for RecordingProcessor {
    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        methods: &[&str],
    ) -> Result<PaymentIntent, AppError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(IntentRequest {
            amount: amount_minor,
            currency: currency.to_string(),
            methods: methods.iter().map(|m| m.to_string()).collect(),
        });

        if self.fail {
            return Err(AppError::ProcessorError("card network unavailable".to_string()));
        }

        let n = requests.len();
        Ok(PaymentIntent {
            id: format!("pi_test_{}", n),
            amount: amount_minor,
            currency: currency.to_string(),
            client_secret: format!("pi_test_{}_secret_{}", n, amount_minor),
        })
    }
}

pub struct TestContext {
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
    pub processor: Arc<RecordingProcessor>,
}

impl TestContext {
    pub fn bearer(&self, email: &str) -> (&'static str, String) {
        let token = self.state.tokens().issue(email).unwrap();
        ("Authorization", format!("Bearer {}", token))
    }
}

pub fn test_context() -> TestContext {
    let store = Arc::new(InMemoryStore::default());
    let processor = Arc::new(RecordingProcessor::default());
    let state = AppState::new(
        TokenService::new(TEST_SECRET),
        store.clone(),
        processor.clone(),
    );

    TestContext { state, store, processor }
}
