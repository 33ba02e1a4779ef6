use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParserError {
    #[error("malformed price token \"{token}\" in line \"{line}\"")]
    MalformedPriceToken { line: String, token: String },

    #[error("cost must be positive, got {cost}")]
    NonPositiveCost { cost: Decimal },

    #[error("sale price {value} does not fit in a whole-dollar amount")]
    PriceOverflow { value: Decimal },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read message source at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("message handle \"{handle}\" is not known to this source")]
    UnknownHandle { handle: String },
}
