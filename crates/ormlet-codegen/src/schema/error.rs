use proc_macro2::Span;

/// Resolution- and emission-time failures, reported against the offending
/// declaration or property. Every error is fatal to the entity being
/// processed; errors for independent entities do not cascade.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("`#[entity]` must be applied to a struct or a trait")]
    InvalidDeclarationKind { span: Span },

    #[error("proxy entity `{entity}` must extend the `Entity` capability marker")]
    MissingCapabilityMarker { entity: String, span: Span },

    #[error("no storage type for property `{property}` of type `{ty}`")]
    UnresolvedStorageType {
        property: String,
        ty: String,
        span: Span,
    },

    #[error("converter `{converter}` must be a fieldless unit struct")]
    ConverterNotSingleton { converter: String, span: Span },

    #[error(
        "property `{property}` combines a reference with an explicit storage type or converter"
    )]
    ConflictingTypeOverride { property: String, span: Span },

    #[error(
        "reference `{property}` requires target `{target}` to expose exactly one \
         concrete primary key column, found {found}"
    )]
    AmbiguousReferenceTarget {
        property: String,
        target: String,
        found: usize,
        span: Span,
    },

    #[error("reference `{property}` targets `{target}`, which is not a resolved entity")]
    UnknownEntity {
        property: String,
        target: String,
        span: Span,
    },

    #[error("field `{property}` has no mapped column and no usable default")]
    UnmappedConstructorParameter { property: String, span: Span },

    #[error("table name `{name}` resolved for more than one entity")]
    DuplicateTableName { name: String, span: Span },

    #[error("cannot generate an update helper for `{entity}`: no primary key column")]
    MissingUpdateKey { entity: String, span: Span },

    #[error("schema module has no `#[database]` configuration item")]
    MissingConfig,

    #[error("schema module has more than one `#[database]` configuration item")]
    DuplicateConfig { span: Span },

    #[error("converter `{name}` is registered in the configuration but not declared")]
    UnknownConverter { name: String, span: Span },

    #[error(transparent)]
    Parse(#[from] syn::Error),

    #[error("{}", .0.iter().map(|err| err.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<Error>),
}

impl Error {
    pub fn span(&self) -> Span {
        match self {
            Error::InvalidDeclarationKind { span }
            | Error::MissingCapabilityMarker { span, .. }
            | Error::UnresolvedStorageType { span, .. }
            | Error::ConverterNotSingleton { span, .. }
            | Error::ConflictingTypeOverride { span, .. }
            | Error::AmbiguousReferenceTarget { span, .. }
            | Error::UnknownEntity { span, .. }
            | Error::UnmappedConstructorParameter { span, .. }
            | Error::DuplicateTableName { span, .. }
            | Error::MissingUpdateKey { span, .. }
            | Error::DuplicateConfig { span } => *span,
            Error::UnknownConverter { span, .. } => *span,
            Error::MissingConfig => Span::call_site(),
            Error::Parse(err) => err.span(),
            Error::Multiple(errors) => errors
                .first()
                .map(Error::span)
                .unwrap_or_else(Span::call_site),
        }
    }

    pub fn into_syn(self) -> syn::Error {
        match self {
            Error::Parse(err) => err,
            Error::Multiple(errors) => {
                let mut iter = errors.into_iter().map(Error::into_syn);
                let mut combined = iter
                    .next()
                    .unwrap_or_else(|| syn::Error::new(Span::call_site(), "unknown error"));
                for err in iter {
                    combined.combine(err);
                }
                combined
            }
            other => syn::Error::new(other.span(), other.to_string()),
        }
    }
}

/// Accumulates errors so a declaration reports every problem at once.
#[derive(Debug, Default)]
pub(crate) struct ErrorSet {
    errors: Vec<Error>,
}

impl ErrorSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, err: impl Into<Error>) {
        self.errors.push(err.into());
    }

    pub(crate) fn collect(mut self) -> Result<(), Error> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(Error::Multiple(self.errors)),
        }
    }
}
