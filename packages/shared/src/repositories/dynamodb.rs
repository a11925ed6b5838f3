//! Paging and batching helpers shared by the DynamoDB repositories.

use aws_sdk_dynamodb::operation::query::builders::QueryFluentBuilder;
use aws_sdk_dynamodb::types::{AttributeValue, DeleteRequest, WriteRequest};
use aws_sdk_dynamodb::Client;
use serde::de::DeserializeOwned;
use serde_dynamo::from_item;
use std::collections::HashMap;

pub type Item = HashMap<String, AttributeValue>;

/// DynamoDB caps a single BatchWriteItem call at 25 requests.
const BATCH_WRITE_LIMIT: usize = 25;

#[derive(Debug)]
pub enum StoreError {
    Serialization(String),
    DynamoDb(String),
}

/// Reads every item of a table, following `LastEvaluatedKey` until the scan is
/// exhausted.
pub async fn scan_all<T: DeserializeOwned>(
    client: &Client,
    table_name: &str,
) -> Result<Vec<T>, StoreError> {
    let mut records = Vec::new();
    let mut exclusive_start_key: Option<Item> = None;

    loop {
        let output = client
            .scan()
            .table_name(table_name)
            .set_exclusive_start_key(exclusive_start_key.take())
            .send()
            .await
            .map_err(|e| StoreError::DynamoDb(e.to_string()))?;

        for item in output.items.unwrap_or_default() {
            records.push(from_item(item).map_err(|e| StoreError::Serialization(e.to_string()))?);
        }

        match output.last_evaluated_key {
            Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
            _ => break,
        }
    }

    Ok(records)
}

/// Runs a prepared query page by page and collects every result.
pub async fn query_all<T: DeserializeOwned>(query: QueryFluentBuilder) -> Result<Vec<T>, StoreError> {
    let mut records = Vec::new();
    let mut exclusive_start_key: Option<Item> = None;

    loop {
        let output = query
            .clone()
            .set_exclusive_start_key(exclusive_start_key.take())
            .send()
            .await
            .map_err(|e| StoreError::DynamoDb(e.to_string()))?;

        for item in output.items.unwrap_or_default() {
            records.push(from_item(item).map_err(|e| StoreError::Serialization(e.to_string()))?);
        }

        match output.last_evaluated_key {
            Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
            _ => break,
        }
    }

    Ok(records)
}

/// Deletes the given primary keys in batches. Unprocessed items are reported
/// as a failure rather than resubmitted.
pub async fn batch_delete(
    client: &Client,
    table_name: &str,
    keys: Vec<Item>,
) -> Result<usize, StoreError> {
    let total = keys.len();

    for chunk in keys.chunks(BATCH_WRITE_LIMIT) {
        let mut requests = Vec::with_capacity(chunk.len());
        for key in chunk {
            let delete = DeleteRequest::builder()
                .set_key(Some(key.clone()))
                .build()
                .map_err(|e| StoreError::DynamoDb(e.to_string()))?;
            requests.push(WriteRequest::builder().delete_request(delete).build());
        }

        let output = client
            .batch_write_item()
            .request_items(table_name, requests)
            .send()
            .await
            .map_err(|e| StoreError::DynamoDb(e.to_string()))?;

        let unprocessed = output
            .unprocessed_items
            .as_ref()
            .and_then(|items| items.get(table_name))
            .map_or(0, |requests| requests.len());
        if unprocessed > 0 {
            return Err(StoreError::DynamoDb(format!(
                "{} of {} deletes in {} were left unprocessed",
                unprocessed, total, table_name
            )));
        }
    }

    Ok(total)
}

pub fn string_key(name: &str, value: &str) -> Item {
    HashMap::from([(name.to_string(), AttributeValue::S(value.to_string()))])
}
