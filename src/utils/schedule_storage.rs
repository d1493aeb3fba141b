// marshal-service/src/utils/schedule_storage.rs
use crate::models::{Event, ServiceError, Shift, Team};
use log::{error, warn};
use std::fs;
use std::path::Path;

const EVENTS_DIR: &str = "./storage/events";
const TEAMS_DIR: &str = "./storage/teams";
const SHIFTS_DIR: &str = "./storage/shifts";

fn ensure_dir(dir: &str) -> Result<(), ServiceError> {
    let path = Path::new(dir);
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            error!("Failed to create storage directory {}: {:?}", dir, e);
            ServiceError::InternalServerError
        })?;
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(dir: &str, id: &str, value: &T) -> Result<(), ServiceError> {
    ensure_dir(dir)?;

    let json = serde_json::to_string_pretty(value).map_err(|e| {
        error!("Failed to serialize record {}: {:?}", id, e);
        ServiceError::InternalServerError
    })?;

    fs::write(format!("{}/{}.json", dir, id), json).map_err(|e| {
        error!("Failed to save record {}: {:?}", id, e);
        ServiceError::InternalServerError
    })
}

fn read_json<T: serde::de::DeserializeOwned>(dir: &str, id: &str) -> Result<Option<T>, ServiceError> {
    let file_path = format!("{}/{}.json", dir, id);
    let path = Path::new(&file_path);

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        error!("Failed to read record {}: {:?}", id, e);
        ServiceError::InternalServerError
    })?;

    let value = serde_json::from_str(&content).map_err(|e| {
        error!("Failed to parse record {}: {:?}", id, e);
        ServiceError::InternalServerError
    })?;

    Ok(Some(value))
}

fn scan_dir<T: serde::de::DeserializeOwned>(dir: &str) -> Result<Vec<T>, ServiceError> {
    ensure_dir(dir)?;

    let mut records = Vec::new();

    for entry_result in fs::read_dir(dir).map_err(|e| {
        error!("Failed to read storage directory {}: {:?}", dir, e);
        ServiceError::InternalServerError
    })? {
        let entry = entry_result.map_err(|e| {
            error!("Failed to read directory entry: {:?}", e);
            ServiceError::InternalServerError
        })?;

        let path = entry.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            let content = fs::read_to_string(&path).map_err(|e| {
                error!("Failed to read record file: {:?}", e);
                ServiceError::InternalServerError
            })?;

            match serde_json::from_str(&content) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Skipping unparseable record {:?}: {:?}", path, e);
                    continue;
                }
            }
        }
    }

    Ok(records)
}

// Events

pub fn save_event(event: &Event) -> Result<(), ServiceError> {
    write_json(EVENTS_DIR, &event.id, event)
}

pub fn find_event_by_id(event_id: &str) -> Result<Option<Event>, ServiceError> {
    read_json(EVENTS_DIR, event_id)
}

pub fn list_events() -> Result<Vec<Event>, ServiceError> {
    let mut events: Vec<Event> = scan_dir(EVENTS_DIR)?;
    events.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(events)
}

pub fn set_event_active(event_id: &str, active: bool) -> Result<Event, ServiceError> {
    let mut event = find_event_by_id(event_id)?.ok_or(ServiceError::NotFound)?;
    event.active = active;
    save_event(&event)?;
    Ok(event)
}

// Teams

pub fn save_team(team: &Team) -> Result<(), ServiceError> {
    write_json(TEAMS_DIR, &team.id, team)
}

pub fn find_team_by_id(team_id: &str) -> Result<Option<Team>, ServiceError> {
    read_json(TEAMS_DIR, team_id)
}

pub fn list_teams_for_event(event_id: &str) -> Result<Vec<Team>, ServiceError> {
    let mut teams: Vec<Team> = scan_dir(TEAMS_DIR)?;
    teams.retain(|t: &Team| t.event_id == event_id);
    teams.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(teams)
}

pub fn set_team_active(team_id: &str, active: bool) -> Result<Team, ServiceError> {
    let mut team = find_team_by_id(team_id)?.ok_or(ServiceError::NotFound)?;
    team.active = active;
    save_team(&team)?;
    Ok(team)
}

// Shifts

pub fn save_shift(shift: &Shift) -> Result<(), ServiceError> {
    write_json(SHIFTS_DIR, &shift.id, shift)
}

pub fn find_shift_by_id(shift_id: &str) -> Result<Option<Shift>, ServiceError> {
    read_json(SHIFTS_DIR, shift_id)
}

pub fn list_shifts_for_team(team_id: &str) -> Result<Vec<Shift>, ServiceError> {
    let mut shifts: Vec<Shift> = scan_dir(SHIFTS_DIR)?;
    shifts.retain(|s: &Shift| s.team_id == team_id);
    shifts.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
    Ok(shifts)
}
