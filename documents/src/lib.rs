// documents/src/lib.rs
//
// Thin helpers over a document-store collection handle. Each function
// performs exactly one native operation; driver errors propagate to the
// caller untranslated.

use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::{Bson, Document, doc};
use mongodb::error::Result;
use mongodb::results::UpdateResult;

/// List every document in `collection`.
pub async fn list_all(collection: &Collection<Document>) -> Result<Vec<Document>> {
    collection.find(doc! {}).await?.try_collect().await
}

/// Insert a new document built from an arbitrary field mapping and
/// return the identifier the store generated for it.
pub async fn insert_school(
    collection: &Collection<Document>,
    fields: Document,
) -> Result<Bson> {
    Ok(collection.insert_one(fields).await?.inserted_id)
}

/// Replace the `topics` of every school document matching `name`.
pub async fn update_topics(
    collection: &Collection<Document>,
    name: &str,
    topics: &[String],
) -> Result<UpdateResult> {
    collection
        .update_many(school_filter(name), topics_update(topics))
        .await
}

fn school_filter(name: &str) -> Document {
    doc! { "name": name }
}

fn topics_update(topics: &[String]) -> Document {
    doc! { "$set": { "topics": topics } }
}
