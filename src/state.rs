use crate::directory::Classroom;
use crate::error::AppError;
use crate::occupancy::{OccupancyObservation, OccupancySnapshot};
use crate::timetable::ScheduleError;
use crate::timetable::session::{ClassSession, SessionDraft};
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use tokio::sync::watch;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10_000;

#[derive(Debug)]
pub struct AppState {
    classrooms: Vec<Classroom>,
    sessions: Vec<ClassSession>,
    next_session_seq: u64,
    snapshots: HashMap<String, OccupancySnapshot>,
    snapshots_tx: watch::Sender<HashMap<String, OccupancySnapshot>>,
    history: VecDeque<OccupancyObservation>,
    history_capacity: usize,
    static_dir: PathBuf,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_history_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_history_capacity(history_capacity: usize) -> Self {
        let (snapshots_tx, _snapshots_rx) = watch::channel(HashMap::new());
        Self {
            classrooms: Vec::new(),
            sessions: Vec::new(),
            next_session_seq: 1,
            snapshots: HashMap::new(),
            snapshots_tx,
            history: VecDeque::new(),
            history_capacity,
            static_dir: PathBuf::from("static"),
        }
    }

    pub fn classrooms(&self) -> &[Classroom] {
        &self.classrooms
    }

    pub fn classroom(&self, classroom_id: &str) -> Option<&Classroom> {
        self.classrooms.iter().find(|c| c.id == classroom_id)
    }

    pub fn set_classrooms(&mut self, classrooms: Vec<Classroom>) {
        self.classrooms = classrooms;
    }

    pub fn sessions(&self) -> &[ClassSession] {
        &self.sessions
    }

    pub fn set_sessions(&mut self, sessions: Vec<ClassSession>) {
        self.next_session_seq = sessions.len() as u64 + 1;
        self.sessions = sessions;
    }

    /// Create a session from a draft, assigning the next sequential id.
    pub fn add_session(&mut self, draft: SessionDraft) -> Result<ClassSession, ScheduleError> {
        let id = format!("sched-{:04}", self.next_session_seq);
        let session = ClassSession::from_draft(id, draft)?;
        self.next_session_seq += 1;
        self.sessions.push(session.clone());
        Ok(session)
    }

    pub fn snapshots(&self) -> &HashMap<String, OccupancySnapshot> {
        &self.snapshots
    }

    pub fn snapshot(&self, classroom_id: &str) -> Option<&OccupancySnapshot> {
        self.snapshots.get(classroom_id)
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<HashMap<String, OccupancySnapshot>> {
        self.snapshots_tx.subscribe()
    }

    /// Store a snapshot (last write wins per classroom) and append one row
    /// to the audit history.
    pub fn upsert_snapshot(&mut self, snapshot: OccupancySnapshot) -> Result<(), AppError> {
        self.history
            .push_back(OccupancyObservation::from_snapshot(&snapshot));
        while self.history.len() > self.history_capacity {
            self.history.pop_front();
        }
        self.snapshots
            .insert(snapshot.classroom_id.clone(), snapshot);
        self.snapshots_tx
            .send(self.snapshots.clone())
            .map_err(|_| AppError::WatchSend)
    }

    pub fn history(&self) -> &VecDeque<OccupancyObservation> {
        &self.history
    }

    pub fn static_dir(&self) -> &PathBuf {
        &self.static_dir
    }

    pub fn set_static_dir(&mut self, static_dir: PathBuf) {
        self.static_dir = static_dir;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
