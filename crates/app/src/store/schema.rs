//! Collection schemas provisioned by the seeder.

use serde::Serialize;
use serde_json::{Value, json};

use camp_registry::{
    camps::CampField,
    documents::{DocumentStatus, MAX_UPLOAD_BYTES},
};

use crate::store::records::{CAMPS, DOCUMENTS};

/// MIME types the `documents.file` field accepts: scans for checklist
/// documents, spreadsheets for periodic reports.
pub const FILE_MIME_TYPES: [&str; 6] = [
    "application/pdf",
    "image/jpeg",
    "image/png",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/csv",
];

/// Column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Url,
    Number,
    Bool,
    Select,
    Relation,
    File,
}

/// One column definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    pub required: bool,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

impl FieldSchema {
    fn new(name: impl Into<String>, kind: FieldType) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            options: Value::Null,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }
}

/// Collection definition sent to `POST /api/collections`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub schema: Vec<FieldSchema>,
    pub list_rule: String,
    pub view_rule: String,
    pub create_rule: String,
    pub update_rule: String,
    pub delete_rule: String,
}

impl CollectionSchema {
    /// Base collection open to any authenticated account.
    fn base(name: &str, schema: Vec<FieldSchema>) -> Self {
        let authenticated = "@request.auth.id != \"\"".to_string();

        Self {
            name: name.to_string(),
            kind: "base",
            schema,
            list_rule: authenticated.clone(),
            view_rule: authenticated.clone(),
            create_rule: authenticated.clone(),
            update_rule: authenticated.clone(),
            delete_rule: authenticated,
        }
    }
}

/// The `camps` collection: one column per camp field.
pub fn camps_collection() -> CollectionSchema {
    let schema = CampField::ALL
        .into_iter()
        .map(|field| {
            let column = FieldSchema::new(field.column(), field_type(field));

            match field {
                CampField::Name | CampField::Email => column.required(),
                _ => column,
            }
        })
        .collect();

    CollectionSchema::base(CAMPS, schema)
}

/// The `documents` collection. `camps_id` is the id the server assigned to
/// the camps collection.
pub fn documents_collection(camps_id: &str) -> CollectionSchema {
    let statuses: Vec<_> = DocumentStatus::ALL
        .into_iter()
        .map(DocumentStatus::as_str)
        .collect();

    CollectionSchema::base(
        DOCUMENTS,
        vec![
            FieldSchema::new("type", FieldType::Text),
            FieldSchema::new("status", FieldType::Select)
                .options(json!({ "maxSelect": 1, "values": statuses })),
            FieldSchema::new("camp", FieldType::Relation)
                .required()
                .options(json!({
                    "collectionId": camps_id,
                    "cascadeDelete": true,
                    "maxSelect": 1,
                })),
            FieldSchema::new("file", FieldType::File).options(json!({
                "maxSelect": 1,
                "maxSize": MAX_UPLOAD_BYTES,
                "mimeTypes": FILE_MIME_TYPES,
            })),
        ],
    )
}

fn field_type(field: CampField) -> FieldType {
    match field {
        CampField::Email => FieldType::Email,
        CampField::Website => FieldType::Url,
        CampField::Capacity | CampField::TicketCost => FieldType::Number,
        CampField::HasSwimming | CampField::IsVerified => FieldType::Bool,
        _ => FieldType::Text,
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn camps_collection_covers_every_field() {
        let collection = camps_collection();

        assert_eq!(collection.schema.len(), CampField::ALL.len());
        assert!(
            collection
                .schema
                .iter()
                .any(|field| field.name == "email" && field.required && field.kind == FieldType::Email),
            "email must be a required email column"
        );
    }

    #[test]
    fn documents_relation_cascades() -> TestResult {
        let json = serde_json::to_value(documents_collection("abc123"))?;
        let camp = json["schema"]
            .as_array()
            .and_then(|fields| fields.iter().find(|field| field["name"] == "camp"))
            .ok_or("camp relation missing")?;

        assert_eq!(camp["options"]["collectionId"], "abc123");
        assert_eq!(camp["options"]["cascadeDelete"], true);
        assert_eq!(json["listRule"], "@request.auth.id != \"\"");

        Ok(())
    }
}
