//! MongoSlotStore - the `AvailableTimes` collection over the mongodb sync driver.

use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::sync::{Client, Collection};
use mongodb::IndexModel;
use tracing::{info, warn};

use super::{AvailableTime, NewSlot, SlotKey, SlotStore, StoreError};

const DUPLICATE_KEY: i32 = 11000;
const SLOT_KEY_INDEX: &str = "slot_key_unique";

/// Where the collection lives.
#[derive(Debug, Clone)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

/// Slot store backed by one MongoDB collection.
///
/// Documents are `{ _id: ObjectId, dentist_id, start_time, end_time }`.
/// `dentist_id` is an ObjectId whenever the id is a valid one, which is how
/// existing documents in the collection store it; reads accept either form.
/// A unique compound index on the slot key backs `insert`'s duplicate check.
#[derive(Clone)]
pub struct MongoSlotStore {
    collection: Collection<Document>,
}

impl MongoSlotStore {
    /// Connect, verify the server answers, and ensure the slot key index.
    pub fn connect(settings: &MongoSettings) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&settings.uri).map_err(storage)?;
        let database = client.database(&settings.database);
        database
            .run_command(doc! { "ping": 1 }, None)
            .map_err(storage)?;

        let store = Self {
            collection: database.collection::<Document>(&settings.collection),
        };
        store.ensure_slot_key_index();

        info!(
            database = %settings.database,
            collection = %settings.collection,
            "connected to mongodb"
        );
        Ok(store)
    }

    /// Creating the index fails when legacy duplicates are already stored;
    /// the handlers' existence check still applies in that case.
    fn ensure_slot_key_index(&self) {
        let index = IndexModel::builder()
            .keys(doc! { "dentist_id": 1, "start_time": 1, "end_time": 1 })
            .options(
                IndexOptions::builder()
                    .name(SLOT_KEY_INDEX.to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        if let Err(e) = self.collection.create_index(index, None) {
            warn!(error = %e, "could not create unique slot key index");
        }
    }
}

fn storage(err: MongoError) -> StoreError {
    StoreError::Storage(err.to_string())
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

/// Stored form of a dentist id: an ObjectId when the id is one, else the string.
fn dentist_value(dentist_id: &str) -> Bson {
    match ObjectId::parse_str(dentist_id) {
        Ok(oid) => Bson::ObjectId(oid),
        Err(_) => Bson::String(dentist_id.to_string()),
    }
}

/// Matches a dentist id stored either as an ObjectId or as its hex string.
fn dentist_filter(dentist_id: &str) -> Bson {
    match ObjectId::parse_str(dentist_id) {
        Ok(oid) => Bson::Document(doc! { "$in": [oid, dentist_id] }),
        Err(_) => Bson::String(dentist_id.to_string()),
    }
}

fn key_filter(key: &SlotKey) -> Document {
    doc! {
        "dentist_id": dentist_filter(&key.dentist_id),
        "start_time": key.start_time,
        "end_time": key.end_time,
    }
}

fn slot_document(key: &SlotKey) -> Document {
    doc! {
        "dentist_id": dentist_value(&key.dentist_id),
        "start_time": key.start_time,
        "end_time": key.end_time,
    }
}

fn read_instant(document: &Document, field: &str) -> Result<i64, StoreError> {
    match document.get(field) {
        Some(Bson::Int64(v)) => Ok(*v),
        Some(Bson::Int32(v)) => Ok(i64::from(*v)),
        other => Err(StoreError::Decode(format!(
            "{} is not an integer: {:?}",
            field, other
        ))),
    }
}

fn from_document(document: &Document) -> Result<AvailableTime, StoreError> {
    let id = match document.get("_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(s)) => s.clone(),
        other => return Err(StoreError::Decode(format!("unexpected _id: {:?}", other))),
    };
    let dentist_id = match document.get("dentist_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(s)) => s.clone(),
        other => {
            return Err(StoreError::Decode(format!(
                "dentist_id is not an id: {:?}",
                other
            )))
        }
    };

    Ok(AvailableTime {
        id,
        dentist_id,
        start_time: read_instant(document, "start_time")?,
        end_time: read_instant(document, "end_time")?,
    })
}

impl SlotStore for MongoSlotStore {
    fn insert(&self, slot: &NewSlot) -> Result<String, StoreError> {
        let key = slot.key();
        let result = self
            .collection
            .insert_one(slot_document(&key), None)
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    StoreError::Duplicate(key.clone())
                } else {
                    storage(e)
                }
            })?;

        Ok(match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        })
    }

    fn find_by_dentist(&self, dentist_id: &str) -> Result<Vec<AvailableTime>, StoreError> {
        let cursor = self
            .collection
            .find(doc! { "dentist_id": dentist_filter(dentist_id) }, None)
            .map_err(storage)?;

        let mut slots = Vec::new();
        for document in cursor {
            let document = document.map_err(storage)?;
            slots.push(from_document(&document)?);
        }
        Ok(slots)
    }

    fn count_matching(&self, key: &SlotKey) -> Result<u64, StoreError> {
        self.collection
            .count_documents(key_filter(key), None)
            .map_err(storage)
    }

    fn delete_by_id(&self, id: &str) -> Result<u64, StoreError> {
        let oid = ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))?;
        let result = self
            .collection
            .delete_one(doc! { "_id": oid }, None)
            .map_err(storage)?;
        Ok(result.deleted_count)
    }
}
