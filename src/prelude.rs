pub use crate::base::{
    config::Config,
    types::{Res, Void},
};
pub use anyhow::anyhow;
pub use tracing::{Instrument, debug, error, info, instrument, warn};
