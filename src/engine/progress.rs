use super::init::InitRecord;

/// Receives one event per constructed individual.
pub trait InitCallback: Send {
    fn on_individual(&mut self, index: usize, record: &InitRecord);
}

/// Ignores everything; for callers that only want the population.
pub struct NoopInitCallback;

impl InitCallback for NoopInitCallback {
    fn on_individual(&mut self, _index: usize, _record: &InitRecord) {}
}

pub struct ConsoleInitCallback;

impl InitCallback for ConsoleInitCallback {
    fn on_individual(&mut self, index: usize, record: &InitRecord) {
        if (index + 1) % 50 == 0 {
            println!(
                "  built {} individuals (latest: {:?} at depth {})",
                index + 1,
                record.method,
                record.depth
            );
        }
    }
}

// For IPC communication with a monitoring frontend.
pub struct ChannelInitCallback {
    sender: std::sync::mpsc::Sender<InitMessage>,
}

#[derive(Debug, Clone, Copy)]
pub enum InitMessage {
    Individual { index: usize, record: InitRecord },
}

impl ChannelInitCallback {
    pub fn new(sender: std::sync::mpsc::Sender<InitMessage>) -> Self {
        ChannelInitCallback { sender }
    }
}

impl InitCallback for ChannelInitCallback {
    fn on_individual(&mut self, index: usize, record: &InitRecord) {
        let _ = self.sender.send(InitMessage::Individual {
            index,
            record: *record,
        });
    }
}
