//! Fixture builders for integration tests.
//!
//! Every fixture generates fresh ids so tests sharing the database never
//! collide.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use server_core::common::{
    AssignmentId, BuildingId, InterventionId, QuoteId, TeamId, UserId,
};
use server_core::domains::interventions::models::{
    Assignment, BuildingManager, Intervention, ProviderInstruction, TimeSlot,
};
use server_core::domains::notifications::Recipient;
use server_core::domains::quotes::models::Quote;

/// Insert a user reachable over push and email.
pub async fn user(pool: &PgPool, name: &str) -> UserId {
    let recipient = Recipient {
        id: UserId::new(),
        display_name: name.to_string(),
        email: Some(format!("{}@example.org", name.replace(' ', "."))),
        expo_push_token: Some(format!("ExponentPushToken[{}]", name)),
    };
    recipient.insert(pool).await.expect("insert user").id
}

/// Insert a user with no push token and no email (in-app only).
pub async fn unreachable_user(pool: &PgPool, name: &str) -> UserId {
    let recipient = Recipient {
        id: UserId::new(),
        display_name: name.to_string(),
        email: None,
        expo_push_token: None,
    };
    recipient.insert(pool).await.expect("insert user").id
}

/// Insert an intervention in the given status.
pub async fn intervention(
    pool: &PgPool,
    status: &str,
    created_by: UserId,
) -> Intervention {
    intervention_in_building(pool, status, created_by, BuildingId::new()).await
}

/// Insert an intervention in the given status and building.
pub async fn intervention_in_building(
    pool: &PgPool,
    status: &str,
    created_by: UserId,
    building_id: BuildingId,
) -> Intervention {
    Intervention {
        id: InterventionId::new(),
        team_id: TeamId::new(),
        building_id,
        lot_id: None,
        title: "Boiler leaking in basement".to_string(),
        description: Some("Tenant reports water on the floor".to_string()),
        status: status.to_string(),
        scheduled_date: None,
        requires_participant_confirmation: false,
        parent_intervention_id: None,
        created_by,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
    .insert(pool)
    .await
    .expect("insert intervention")
}

/// Give an intervention a scheduled date one week out.
pub async fn schedule(pool: &PgPool, intervention_id: InterventionId) {
    Intervention::set_scheduled_date(intervention_id, Utc::now() + Duration::days(7), pool)
        .await
        .expect("set scheduled date");
}

/// Attach a participant.
pub async fn assign(
    pool: &PgPool,
    intervention_id: InterventionId,
    user_id: UserId,
    role: &str,
    is_primary: bool,
) -> Assignment {
    assign_with_confirmation(
        pool,
        intervention_id,
        user_id,
        role,
        is_primary,
        false,
        "not_required",
    )
    .await
}

/// Attach a participant with an explicit confirmation gate.
pub async fn assign_with_confirmation(
    pool: &PgPool,
    intervention_id: InterventionId,
    user_id: UserId,
    role: &str,
    is_primary: bool,
    requires_confirmation: bool,
    confirmation_status: &str,
) -> Assignment {
    Assignment {
        id: AssignmentId::new(),
        intervention_id,
        user_id,
        role: role.to_string(),
        is_primary,
        requires_confirmation,
        confirmation_status: confirmation_status.to_string(),
        created_at: Utc::now(),
    }
    .insert(pool)
    .await
    .expect("insert assignment")
}

/// Register a building manager.
pub async fn building_manager(pool: &PgPool, building_id: BuildingId, user_id: UserId) {
    BuildingManager {
        building_id,
        user_id,
    }
    .insert(pool)
    .await
    .expect("insert building manager");
}

/// Insert a quote in the given status (legacy spellings allowed).
pub async fn quote(
    pool: &PgPool,
    intervention_id: InterventionId,
    provider_id: UserId,
    status: &str,
) -> Quote {
    Quote {
        id: QuoteId::new(),
        intervention_id,
        provider_id,
        amount: Decimal::new(45_000, 2),
        description: Some("Parts and labor".to_string()),
        status: status.to_string(),
        validated_by: None,
        validated_at: None,
        rejection_reason: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
    .insert(pool)
    .await
    .expect("insert quote")
}

/// Insert a provider-specific time slot.
pub async fn time_slot(
    pool: &PgPool,
    intervention_id: InterventionId,
    provider_id: UserId,
) -> TimeSlot {
    let starts_at = Utc::now() + Duration::days(3);
    TimeSlot {
        id: server_core::common::TimeSlotId::new(),
        intervention_id,
        provider_id: Some(provider_id),
        starts_at,
        ends_at: starts_at + Duration::hours(2),
        created_at: Utc::now(),
    }
    .insert(pool)
    .await
    .expect("insert time slot")
}

/// Insert instructions addressed to one provider.
pub async fn instruction(
    pool: &PgPool,
    intervention_id: InterventionId,
    provider_id: UserId,
    body: &str,
) -> ProviderInstruction {
    ProviderInstruction {
        id: server_core::common::InstructionId::new(),
        intervention_id,
        provider_id,
        body: body.to_string(),
        created_at: Utc::now(),
    }
    .insert(pool)
    .await
    .expect("insert instruction")
}
