// Resource-URI routing onto the keyed tables and the file sandbox

use crate::protocol::{
    ResourceContents, ResourceInfo, ResourceTemplate, MIME_JSON, MIME_MARKDOWN, MIME_TEXT,
};
use crate::tools::describe_fs_error;
use primer_core::{
    Document, FileSandbox, FsError, LookupError, Restaurant, ResourceTable, UserRecord,
};
use std::borrow::Cow;
use std::sync::Arc;

/// Errors surfaced when reading a resource
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Unknown resource: {uri}")]
    UnknownResource { uri: String },

    #[error("{}", describe_fs_error(.0))]
    File(#[from] FsError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Failed to serialize resource: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The parts of a URI the router understands
///
/// Names are percent-decoded, so `restaurant://Seoul%20Grill` and
/// `restaurant://Seoul Grill` address the same record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRoute<'a> {
    Document(Cow<'a, str>),
    AllUsers,
    User(Cow<'a, str>),
    FileList,
    File(Cow<'a, str>),
    Restaurant(Cow<'a, str>),
}

impl<'a> ResourceRoute<'a> {
    /// Match `uri` against the known templates
    ///
    /// `None` for unknown schemes and for names that do not decode to UTF-8.
    pub fn parse(uri: &'a str) -> Option<Self> {
        let (scheme, rest) = uri.split_once("://")?;
        let rest = rest.trim_end_matches('/');
        match scheme {
            "doc" => decode(rest).map(Self::Document),
            "data" => match rest {
                "users" => Some(Self::AllUsers),
                other => decode(other.strip_prefix("users/")?).map(Self::User),
            },
            "file" => match rest {
                "list" => Some(Self::FileList),
                name => decode(name).map(Self::File),
            },
            "restaurant" => decode(rest).map(Self::Restaurant),
            _ => None,
        }
    }
}

fn decode(segment: &str) -> Option<Cow<'_, str>> {
    urlencoding::decode(segment).ok()
}

/// Percent-encode a name for use in a URI, keeping `/` between path segments.
fn encode_path(name: &str) -> String {
    name.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// Maps resource URIs onto the startup tables and the nested file sandbox
pub struct ResourceRouter {
    documents: Arc<ResourceTable<Document>>,
    users: Arc<ResourceTable<UserRecord>>,
    restaurants: Arc<ResourceTable<Restaurant>>,
    files: Arc<FileSandbox>,
}

impl ResourceRouter {
    pub fn new(
        documents: Arc<ResourceTable<Document>>,
        users: Arc<ResourceTable<UserRecord>>,
        restaurants: Arc<ResourceTable<Restaurant>>,
        files: Arc<FileSandbox>,
    ) -> Self {
        Self {
            documents,
            users,
            restaurants,
            files,
        }
    }

    /// Read one resource
    pub fn read(&self, uri: &str) -> Result<ResourceContents, ResourceError> {
        let route = ResourceRoute::parse(uri).ok_or_else(|| ResourceError::UnknownResource {
            uri: uri.to_string(),
        })?;

        let (mime_type, text) = match route {
            ResourceRoute::Document(name) => {
                (MIME_MARKDOWN, self.documents.get(&name)?.body.clone())
            }
            ResourceRoute::AllUsers => (
                MIME_JSON,
                serde_json::to_string_pretty(&self.users.get_all())?,
            ),
            ResourceRoute::User(id) => (
                MIME_JSON,
                serde_json::to_string_pretty(self.users.get(&id)?)?,
            ),
            ResourceRoute::FileList => {
                let files = self.files.list()?;
                let listing = serde_json::json!({ "count": files.len(), "files": files });
                (MIME_JSON, serde_json::to_string_pretty(&listing)?)
            }
            ResourceRoute::File(name) => (MIME_TEXT, self.files.read_to_string(&name)?),
            ResourceRoute::Restaurant(name) => (
                MIME_JSON,
                serde_json::to_string_pretty(self.restaurants.get(&name)?)?,
            ),
        };

        Ok(ResourceContents {
            uri: uri.to_string(),
            mime_type: mime_type.to_string(),
            text,
        })
    }

    /// The URI templates this router answers
    pub fn templates(&self) -> Vec<ResourceTemplate> {
        [
            ("doc://{name}", "document", "Static markdown documents", MIME_MARKDOWN),
            ("data://users/{user_id}", "user", "One user record as JSON", MIME_JSON),
            ("file://{filename}/", "file", "A file under the data directory", MIME_TEXT),
            ("restaurant://{name}", "restaurant", "One restaurant as JSON", MIME_JSON),
        ]
        .into_iter()
        .map(|(uri_template, name, description, mime_type)| ResourceTemplate {
            uri_template: uri_template.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            mime_type: mime_type.to_string(),
        })
        .collect()
    }

    /// Every concrete resource currently readable
    pub fn list(&self) -> Result<Vec<ResourceInfo>, ResourceError> {
        let mut resources = Vec::new();

        for doc in self.documents.records() {
            resources.push(info(
                format!("doc://{}", encode_path(&doc.name)),
                &doc.title,
                MIME_MARKDOWN,
            ));
        }

        resources.push(info("data://users".to_string(), "All users", MIME_JSON));
        for user in self.users.records() {
            resources.push(info(
                format!("data://users/{}", encode_path(&user.id)),
                &user.name,
                MIME_JSON,
            ));
        }

        resources.push(info("file://list/".to_string(), "File listing", MIME_JSON));
        for file in self.files.list()? {
            resources.push(info(format!("file://{}/", encode_path(&file)), &file, MIME_TEXT));
        }

        for name in self.restaurants.keys() {
            resources.push(info(
                format!("restaurant://{}", encode_path(name)),
                name,
                MIME_JSON,
            ));
        }

        Ok(resources)
    }
}

fn info(uri: String, name: &str, mime_type: &str) -> ResourceInfo {
    ResourceInfo {
        uri,
        name: name.to_string(),
        mime_type: mime_type.to_string(),
    }
}

impl ResourceError {
    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownResource { .. } => "unknown_resource",
            Self::File(e) => e.kind(),
            Self::Lookup(e) => e.kind(),
            Self::Serialize(_) => "serialize",
        }
    }
}
