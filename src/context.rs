/// Tracks which interface the descriptors being walked belong to.
///
/// Class specific descriptors follow the interface descriptor they belong to
/// with no explicit parent pointer, so the attribution is whatever interface
/// was seen last. Nothing is attributed to the target before the first
/// interface descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterfaceContext {
    target: u8,
    current: Option<u8>,
}

impl InterfaceContext {
    pub fn new(target: u8) -> Self {
        Self {
            target,
            current: None,
        }
    }

    /// Context for a buffer fetched with a request addressed to `target`,
    /// such as a HID descriptor requested with `wIndex` set to the interface
    pub fn addressed(target: u8) -> Self {
        Self {
            target,
            current: Some(target),
        }
    }

    pub fn on_interface(&mut self, number: u8) {
        self.current = Some(number);
    }

    /// An interface descriptor whose number could not be read. What follows
    /// belongs to no known interface until the next readable one.
    pub fn on_unknown_interface(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<u8> {
        self.current
    }

    pub fn is_target_active(&self) -> bool {
        self.current == Some(self.target)
    }
}
