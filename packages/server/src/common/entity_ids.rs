//! Typed ID definitions for all domain entities.
//!
//! This module defines type aliases for each domain entity, providing
//! compile-time type safety for ID usage throughout the application.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::common::{InterventionId, QuoteId, UserId};
//!
//! // These are incompatible types - compiler prevents mixing them up
//! let intervention_id: InterventionId = InterventionId::new();
//! let quote_id: QuoteId = QuoteId::new();
//!
//! // This would be a compile error:
//! // let wrong: QuoteId = intervention_id;
//! ```

// Re-export the core Id type and version markers
pub use super::id::{Id, V4, V7};

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Intervention entities.
pub struct Intervention;

/// Marker type for Quote entities (provider bids).
pub struct Quote;

/// Marker type for User entities (managers, providers, tenants).
pub struct User;

/// Marker type for Assignment entities (user ↔ intervention links).
pub struct Assignment;

/// Marker type for Team entities.
pub struct Team;

/// Marker type for Building entities.
pub struct Building;

/// Marker type for Lot entities.
pub struct Lot;

/// Marker type for Notification entities (in-app rows).
pub struct Notification;

/// Marker type for ActivityLog entities.
pub struct ActivityLog;

/// Marker type for TimeSlot entities.
pub struct TimeSlot;

/// Marker type for ProviderInstruction entities.
pub struct ProviderInstruction;

/// Marker type for InterventionComment entities.
pub struct InterventionComment;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Intervention entities.
pub type InterventionId = Id<Intervention>;

/// Typed ID for Quote entities.
pub type QuoteId = Id<Quote>;

/// Typed ID for User entities.
pub type UserId = Id<User>;

/// Typed ID for Assignment entities.
pub type AssignmentId = Id<Assignment>;

/// Typed ID for Team entities.
pub type TeamId = Id<Team>;

/// Typed ID for Building entities.
pub type BuildingId = Id<Building>;

/// Typed ID for Lot entities.
pub type LotId = Id<Lot>;

/// Typed ID for Notification entities.
pub type NotificationId = Id<Notification>;

/// Typed ID for ActivityLog entities.
pub type ActivityLogId = Id<ActivityLog>;

/// Typed ID for TimeSlot entities.
pub type TimeSlotId = Id<TimeSlot>;

/// Typed ID for ProviderInstruction entities.
pub type InstructionId = Id<ProviderInstruction>;

/// Typed ID for InterventionComment entities.
pub type CommentId = Id<InterventionComment>;
