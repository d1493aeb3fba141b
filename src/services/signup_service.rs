// src/services/signup_service.rs
//
// Signup orchestration: lockdown gate, active-scope check, then the
// capacity/overlap check and the insert as one atomic step against the
// assignment registry.

use crate::models::{Assignment, ServiceError, Shift};
use crate::utils::lockdown::{LockdownScope, LOCKDOWN};
use crate::utils::schedule_storage;
use chrono::Utc;
use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

const ASSIGNMENTS_DIR: &str = "./storage/assignments";

// Process-wide assignment registry. All committed assignments live behind a
// single guard; the capacity count, the overlap scan, the insert and the
// write-through persist of a signup happen while holding it, so concurrent
// signups observe one consistent snapshot (serializable per shift and per
// user). Loaded from disk once on first access.
pub struct AssignmentRegistry {
    assignments: Mutex<Vec<Assignment>>,
}

impl AssignmentRegistry {
    fn load() -> Self {
        let mut assignments = Vec::new();
        let dir = Path::new(ASSIGNMENTS_DIR);

        if dir.exists() {
            match fs::read_dir(dir) {
                Ok(entries) => {
                    for entry in entries.flatten() {
                        let path = entry.path();
                        if !path.is_file() || !path.extension().map_or(false, |ext| ext == "json") {
                            continue;
                        }
                        match fs::read_to_string(&path) {
                            Ok(content) => match serde_json::from_str::<Assignment>(&content) {
                                Ok(assignment) => assignments.push(assignment),
                                Err(e) => warn!("Skipping unparseable assignment {:?}: {:?}", path, e),
                            },
                            Err(e) => warn!("Failed to read assignment {:?}: {:?}", path, e),
                        }
                    }
                }
                Err(e) => warn!("Failed to scan assignments directory: {:?}", e),
            }
        }

        info!("Loaded {} committed assignments", assignments.len());

        Self {
            assignments: Mutex::new(assignments),
        }
    }

    // Capacity + overlap check and insert under one guard. `capacity == 0`
    // always rejects. Overlap uses the half-open interval rule: touching
    // endpoints do not conflict. An existing assignment to the same shift
    // counts as a conflict even when the interval is zero-length.
    pub fn try_signup(&self, user_id: &str, shift: &Shift) -> Result<Assignment, ServiceError> {
        let mut assignments = self
            .assignments
            .lock()
            .map_err(|_| ServiceError::InternalServerError)?;

        let taken = assignments.iter().filter(|a| a.shift_id == shift.id).count();
        if taken as u32 >= shift.capacity {
            return Err(ServiceError::CapacityExceeded);
        }

        let conflict = assignments.iter().any(|a| {
            a.user_id == user_id
                && (a.shift_id == shift.id
                    || (a.starts_at < shift.ends_at && shift.starts_at < a.ends_at))
        });
        if conflict {
            return Err(ServiceError::OverlapConflict);
        }

        let assignment = Assignment {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            shift_id: shift.id.clone(),
            starts_at: shift.starts_at,
            ends_at: shift.ends_at,
            created_at: Utc::now(),
        };

        assignments.push(assignment.clone());

        // Persist inside the guard; roll the insert back if the write fails
        // so memory and disk never disagree.
        if let Err(e) = persist_assignment(&assignment) {
            assignments.pop();
            return Err(e);
        }

        Ok(assignment)
    }

    // Remove the caller's assignment for a shift. No capacity or overlap
    // checks apply on this path.
    pub fn remove(&self, user_id: &str, shift_id: &str) -> Result<Assignment, ServiceError> {
        let mut assignments = self
            .assignments
            .lock()
            .map_err(|_| ServiceError::InternalServerError)?;

        let index = assignments
            .iter()
            .position(|a| a.user_id == user_id && a.shift_id == shift_id)
            .ok_or(ServiceError::NoAssignment)?;

        let assignment = assignments.remove(index);

        // Roll the removal back if the file delete fails, so a restart
        // cannot resurrect an assignment the caller believes cancelled.
        let file_path = format!("{}/{}.json", ASSIGNMENTS_DIR, assignment.id);
        match fs::remove_file(&file_path) {
            Ok(()) => Ok(assignment),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Assignment file {} was already gone", file_path);
                Ok(assignment)
            }
            Err(e) => {
                error!("Failed to delete assignment file {}: {:?}", file_path, e);
                assignments.insert(index, assignment);
                Err(ServiceError::InternalServerError)
            }
        }
    }

    pub fn count_for_shift(&self, shift_id: &str) -> Result<usize, ServiceError> {
        let assignments = self
            .assignments
            .lock()
            .map_err(|_| ServiceError::InternalServerError)?;
        Ok(assignments.iter().filter(|a| a.shift_id == shift_id).count())
    }

    pub fn for_shift(&self, shift_id: &str) -> Result<Vec<Assignment>, ServiceError> {
        let assignments = self
            .assignments
            .lock()
            .map_err(|_| ServiceError::InternalServerError)?;
        Ok(assignments
            .iter()
            .filter(|a| a.shift_id == shift_id)
            .cloned()
            .collect())
    }

    pub fn for_user(&self, user_id: &str) -> Result<Vec<Assignment>, ServiceError> {
        let assignments = self
            .assignments
            .lock()
            .map_err(|_| ServiceError::InternalServerError)?;
        Ok(assignments
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }
}

fn persist_assignment(assignment: &Assignment) -> Result<(), ServiceError> {
    let dir = Path::new(ASSIGNMENTS_DIR);
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            error!("Failed to create assignments directory: {:?}", e);
            ServiceError::InternalServerError
        })?;
    }

    let assignment_json = serde_json::to_string_pretty(assignment).map_err(|e| {
        error!("Failed to serialize assignment: {:?}", e);
        ServiceError::InternalServerError
    })?;

    fs::write(
        format!("{}/{}.json", ASSIGNMENTS_DIR, assignment.id),
        assignment_json,
    )
    .map_err(|e| {
        error!("Failed to save assignment: {:?}", e);
        ServiceError::InternalServerError
    })
}

// Create a singleton assignment registry
lazy_static::lazy_static! {
    pub static ref ASSIGNMENTS: AssignmentRegistry = AssignmentRegistry::load();
}

// The shift's team and event must both be active for signup and for
// cancellation alike.
fn ensure_scope_active(shift: &Shift) -> Result<(), ServiceError> {
    let team = schedule_storage::find_team_by_id(&shift.team_id)?.ok_or(ServiceError::NotFound)?;
    let event = schedule_storage::find_event_by_id(&team.event_id)?.ok_or(ServiceError::NotFound)?;

    if !team.active || !event.active {
        return Err(ServiceError::Forbidden("inactive-scope".to_string()));
    }

    Ok(())
}

// Sign a user up for a shift: lockdown gate, scope check, then the atomic
// capacity/overlap/commit step. The gate is re-evaluated on every call.
pub fn signup(user_id: &str, shift_id: &str) -> Result<Assignment, ServiceError> {
    if LOCKDOWN.is_locked(LockdownScope::Volunteers)? {
        info!("🔒 Signup blocked by lockdown for user: {}", user_id);
        return Err(ServiceError::Forbidden("lockdown".to_string()));
    }

    let shift = schedule_storage::find_shift_by_id(shift_id)?.ok_or(ServiceError::NotFound)?;
    ensure_scope_active(&shift)?;

    let assignment = ASSIGNMENTS.try_signup(user_id, &shift)?;

    info!("✅ User: {} signed up for shift: {}", user_id, shift_id);

    Ok(assignment)
}

// Cancel a signup. Still subject to the lockdown gate and the active-scope
// check, but not to capacity or overlap validation.
pub fn cancel(user_id: &str, shift_id: &str) -> Result<(), ServiceError> {
    if LOCKDOWN.is_locked(LockdownScope::Volunteers)? {
        info!("🔒 Cancellation blocked by lockdown for user: {}", user_id);
        return Err(ServiceError::Forbidden("lockdown".to_string()));
    }

    let shift = schedule_storage::find_shift_by_id(shift_id)?.ok_or(ServiceError::NotFound)?;
    ensure_scope_active(&shift)?;

    ASSIGNMENTS.remove(user_id, shift_id)?;

    info!("✅ User: {} cancelled signup for shift: {}", user_id, shift_id);

    Ok(())
}
