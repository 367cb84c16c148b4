use log::{debug, info, warn};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

use crate::collect::{collect, FormValues};
use crate::params::ParameterRecord;
use crate::store::ParameterStore;
use crate::tabs::{TabController, TabEvent, TabView};

/// A user action; each kind carries its own handler and output.
pub trait Event {
    type Output;

    fn apply(self, session: &mut Session) -> Self::Output;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Generated {
    pub stored: bool,
    pub alert: String,
    pub record: Option<ParameterRecord>,
}

pub struct Generate(pub FormValues);

#[derive(Clone, Debug, Default)]
pub struct Session {
    pub tabs: TabController,
    pub store: ParameterStore,
}

/// Runs one event to completion against a session.
pub fn dispatch<E: Event>(session: &mut Session, event: E) -> E::Output {
    event.apply(session)
}

impl Event for TabEvent {
    type Output = TabView;

    fn apply(self, session: &mut Session) -> TabView {
        let view = session.tabs.handle(self);
        debug!("tab -> {:?}", session.tabs.active());
        view
    }
}

impl Event for Generate {
    type Output = Generated;

    fn apply(self, session: &mut Session) -> Generated {
        match collect(&self.0) {
            Ok(record) => {
                for (label, value) in record.out_of_range_concentrations() {
                    warn!("{label} concentration {value} outside [0, 1]");
                }
                let name = record.material_properties.material_name.clone();
                session.store.write(record);
                info!(
                    "parameters stored for {name} (write #{})",
                    session.store.writes()
                );
                Generated {
                    stored: true,
                    alert: String::new(),
                    record: session.store.get().cloned(),
                }
            }
            Err(e) => {
                warn!("generate rejected: {e}");
                Generated {
                    stored: false,
                    alert: e.alert(),
                    record: session.store.get().cloned(),
                }
            }
        }
    }
}

pub fn new_session_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect()
}

/// In-memory sessions, oldest evicted first once `capacity` is reached.
#[derive(Debug)]
pub struct Sessions {
    capacity: usize,
    order: VecDeque<String>,
    map: HashMap<String, Session>,
}

impl Sessions {
    pub fn new(capacity: usize) -> Self {
        Sessions {
            capacity: capacity.max(1),
            order: VecDeque::new(),
            map: HashMap::new(),
        }
    }

    pub fn open(&mut self) -> String {
        while self.map.len() >= self.capacity {
            match self.order.pop_front() {
                Some(old) => {
                    self.map.remove(&old);
                    debug!("session {old} evicted");
                }
                None => break,
            }
        }
        let mut id = new_session_id();
        while self.map.contains_key(&id) {
            id = new_session_id();
        }
        self.map.insert(id.clone(), Session::default());
        self.order.push_back(id.clone());
        debug!("session {id} opened ({} live)", self.len());
        id
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.map.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.map.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}
