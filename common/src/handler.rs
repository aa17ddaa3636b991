//! [`Handler`] abstractions.

use std::future::Future;

/// Executable handler.
///
/// A single seam used for every asynchronous operation in the workspace:
/// transports handle wire calls, the API facade handles queries and
/// commands declared on top of them.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
