use crate::params::ParameterRecord;

/// Last successfully validated record for one page session.
#[derive(Clone, Debug, Default)]
pub struct ParameterStore {
    record: Option<ParameterRecord>,
    writes: u64,
}

impl ParameterStore {
    pub fn write(&mut self, record: ParameterRecord) {
        self.record = Some(record);
        self.writes += 1;
    }

    pub fn get(&self) -> Option<&ParameterRecord> {
        self.record.as_ref()
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }
}
