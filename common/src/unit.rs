//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an appointment being scheduled.
#[derive(Clone, Copy, Debug)]
pub struct Schedule;

/// Marker type describing a subscription start.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker type describing a subscription expiration.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;

/// Marker type describing an invoice being issued.
#[derive(Clone, Copy, Debug)]
pub struct Issue;

/// Marker type describing a history record occurrence.
#[derive(Clone, Copy, Debug)]
pub struct Occurrence;
