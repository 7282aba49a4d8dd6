use aws_sdk_dynamodb::error::{self as sdk_error, ProvideErrorMetadata};
use std::{error, fmt};

/// Boxed low-level error kept as the source of store-originated errors.
pub type BoxError = Box<dyn error::Error + Send + Sync + 'static>;

/// Result type for all mapper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Store operation an error was raised from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operation {
    /// Batch put/delete.
    BatchWrite,
    /// Delete of a single item.
    Delete,
    /// Table description fetch.
    DescribeTable,
    /// Single item read.
    Get,
    /// Query, single page or paginated.
    Query,
    /// Put of a whole record.
    Save,
    /// Update of selected attributes.
    Update,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BatchWrite => "batch_write",
            Self::Delete => "delete",
            Self::DescribeTable => "describe_table",
            Self::Get => "get",
            Self::Query => "query",
            Self::Save => "save",
            Self::Update => "update",
        };
        f.write_str(name)
    }
}

/// Broad category of an [`Error`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Malformed input detected before anything reaches the store.
    Validation,
    /// The store, or building a concrete key for it, rejected the operation.
    Operation,
    /// Encoding a record or decoding an item failed.
    Encoding,
}

/// All errors raised by the mapper.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A logical combinator was given fewer than two operands.
    #[error("{operator} requires at least 2 conditions, got {count}")]
    InsufficientConditions {
        /// `And` or `Or`.
        operator: &'static str,
        /// Number of operands actually provided.
        count: usize,
    },

    /// A condition variant is not supported where it was used.
    #[error("Unknown condition type: {condition_type}")]
    UnknownConditionType {
        /// Name of the offending variant.
        condition_type: &'static str,
    },

    /// An update was requested without any field to set.
    #[error("No updates provided")]
    EmptyUpdate,

    /// A key schema descriptor is unusable.
    #[error("{0}")]
    InvalidKeySchema(String),

    /// A secondary index name matched neither global nor local indexes.
    #[error("Index '{index_name}' not found on table")]
    IndexNotFound {
        /// The requested index name.
        index_name: String,
    },

    /// A record does not carry a value for the partition key attribute.
    #[error("Partition key value must be provided for {model_name}")]
    MissingPartitionKeyValue {
        /// Record type name.
        model_name: String,
    },

    /// The table has a sort key but no value was available for it.
    #[error("Sort key value must be provided for {model_name}{}", in_operation(.operation))]
    MissingSortKeyValue {
        /// Record type name.
        model_name: String,
        /// Operation that needed the key, when known.
        operation: Option<Operation>,
    },

    /// The store rejected a conditional write.
    #[error("Condition check failed for {model_name} in {operation} operation")]
    ConditionCheckFailed {
        /// Attempted operation.
        operation: Operation,
        /// Record type name.
        model_name: String,
        /// Original store error.
        #[source]
        source: BoxError,
    },

    /// The table (or index) does not exist.
    #[error("Table '{table_name}' not found for {model_name}")]
    TableNotFound {
        /// Table name the record type is bound to.
        table_name: String,
        /// Record type name.
        model_name: String,
        /// Original store error.
        #[source]
        source: BoxError,
    },

    /// Provisioned throughput or request rate exceeded.
    #[error("Throughput exceeded for {model_name} in {operation} operation")]
    ThroughputExceeded {
        /// Attempted operation.
        operation: Operation,
        /// Record type name.
        model_name: String,
        /// Original store error.
        #[source]
        source: BoxError,
    },

    /// Any other store error.
    #[error(
        "DynamoDB error [{}] for {model_name} in {operation} operation: {}",
        .error_code.as_deref().unwrap_or("Unknown"),
        .message.as_deref().unwrap_or("no message")
    )]
    Client {
        /// Store error code, when the store provided one.
        error_code: Option<String>,
        /// Store error message, when the store provided one.
        message: Option<String>,
        /// Attempted operation.
        operation: Operation,
        /// Record type name.
        model_name: String,
        /// Original store error.
        #[source]
        source: BoxError,
    },

    /// Record to item conversion (or back) failed.
    #[error(transparent)]
    Serialization(#[from] serde_dynamo::Error),

    /// A store request could not be assembled.
    #[error(transparent)]
    Build(#[from] sdk_error::BuildError),
}

fn in_operation(operation: &Option<Operation>) -> String {
    match operation {
        Some(operation) => format!(" in {operation} operation"),
        None => String::new(),
    }
}

/// Where a store error happened, used to tag the wrapped error.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ErrorContext<'a> {
    pub(crate) operation: Operation,
    pub(crate) model_name: &'a str,
    pub(crate) table_name: &'a str,
}

impl Error {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientConditions { .. }
            | Self::UnknownConditionType { .. }
            | Self::EmptyUpdate
            | Self::InvalidKeySchema(_)
            | Self::IndexNotFound { .. } => ErrorKind::Validation,
            Self::MissingPartitionKeyValue { .. }
            | Self::MissingSortKeyValue { .. }
            | Self::ConditionCheckFailed { .. }
            | Self::TableNotFound { .. }
            | Self::ThroughputExceeded { .. }
            | Self::Client { .. } => ErrorKind::Operation,
            Self::Serialization(_) | Self::Build(_) => ErrorKind::Encoding,
        }
    }

    /// Whether this error was raised by the store itself.
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            Self::ConditionCheckFailed { .. }
                | Self::TableNotFound { .. }
                | Self::ThroughputExceeded { .. }
                | Self::Client { .. }
        )
    }

    pub(crate) fn invalid_key_schema() -> Self {
        Self::InvalidKeySchema("Invalid key schema: no partition key found".to_string())
    }

    /// Classify a store error by its code.
    pub(crate) fn from_store_code(
        code: Option<&str>,
        message: Option<&str>,
        context: ErrorContext<'_>,
        source: BoxError,
    ) -> Self {
        let model_name = context.model_name.to_string();
        match code {
            Some("ConditionalCheckFailedException") => Self::ConditionCheckFailed {
                operation: context.operation,
                model_name,
                source,
            },
            Some("ResourceNotFoundException") => Self::TableNotFound {
                table_name: context.table_name.to_string(),
                model_name,
                source,
            },
            Some(
                "ProvisionedThroughputExceededException"
                | "ThrottlingException"
                | "RequestLimitExceeded",
            ) => Self::ThroughputExceeded {
                operation: context.operation,
                model_name,
                source,
            },
            _ => Self::Client {
                error_code: code.map(str::to_string),
                message: message.map(str::to_string),
                operation: context.operation,
                model_name,
                source,
            },
        }
    }

    /// Wrap an SDK error, keeping it as the source.
    pub(crate) fn from_sdk<E, R>(
        error: sdk_error::SdkError<E, R>,
        context: ErrorContext<'_>,
    ) -> Self
    where
        E: ProvideErrorMetadata + error::Error + Send + Sync + 'static,
        R: fmt::Debug + Send + Sync + 'static,
    {
        let code = error.code().map(str::to_string);
        let message = error.message().map(str::to_string);
        Self::from_store_code(
            code.as_deref(),
            message.as_deref(),
            context,
            Box::new(error),
        )
    }
}
