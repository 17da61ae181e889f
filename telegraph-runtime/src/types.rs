// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Shared types.

use std::error::Error;
use std::fmt;

/// The identity of a process within its [`World`](crate::world::World),
/// stable for the run. Ranks are dense: a world of size `N` holds ranks
/// `0..N`.
pub type Rank = usize;

/// The tag carried by every message. A [`recv`](crate::comm::Comm::recv)
/// only matches an envelope whose tag equals the one it asked for.
pub type Tag = usize;

/// Values that can travel through the fabric.
///
/// Any clonable, debuggable type that can move between threads qualifies;
/// the blanket implementation means there is nothing to implement by hand.
pub trait Payload: Clone + fmt::Debug + Send + 'static {}

impl<T> Payload for T where T: Clone + fmt::Debug + Send + 'static {}

// Communication errors

#[macro_export]
/// Build a [CommError] from a message that supports `to_string`
macro_rules! comm_error {
    ($msg:expr) => {
        Err($crate::types::CommError($msg.to_string()))?
    };
}

/// The `CommError` is what should be returned in the case of an error
#[derive(Debug)]
pub struct CommError(pub String);

impl fmt::Display for CommError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error: {}", self.0)
    }
}

impl Error for CommError {}

/// The CommResult is the return type for most communication functions
pub type CommResult = Result<(), CommError>;
