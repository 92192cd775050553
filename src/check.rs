use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The report descriptor length as seen through the three requests
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValidationResult {
    /// `wDescriptorLength` found in the configuration descriptor
    pub from_config_view: Option<u16>,
    /// `wDescriptorLength` found in the HID descriptor
    pub from_hid_view: Option<u16>,
    /// Number of bytes returned when fetching the report descriptor
    pub from_actual_fetch: Option<usize>,
    pub config_matches_actual: bool,
    pub config_matches_hid: bool,
}

impl ValidationResult {
    pub fn is_consistent(&self) -> bool {
        self.config_matches_actual && self.config_matches_hid
    }
}

/// Compare the three lengths. Returns `None` when no source produced one.
pub fn check(
    from_config_view: Option<u16>,
    from_hid_view: Option<u16>,
    from_actual_fetch: Option<usize>,
) -> Option<ValidationResult> {
    if from_config_view.is_none() && from_hid_view.is_none() && from_actual_fetch.is_none() {
        return None;
    }
    Some(ValidationResult {
        from_config_view,
        from_hid_view,
        from_actual_fetch,
        config_matches_actual: agree(from_config_view.map(usize::from), from_actual_fetch),
        config_matches_hid: agree(from_config_view, from_hid_view),
    })
}

/// Only two genuine lengths can agree
fn agree<T: PartialEq>(a: Option<T>, b: Option<T>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

struct Length<T>(Option<T>);

impl<T: fmt::Display> fmt::Display for Length<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(len) => write!(f, "{len}"),
            None => f.write_str("-"),
        }
    }
}

fn verdict(ok: bool) -> &'static str {
    if ok { "OK " } else { "BAD" }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            ">     {} - {} vs {} (configuration descriptor vs actual HID report)",
            verdict(self.config_matches_actual),
            Length(self.from_config_view),
            Length(self.from_actual_fetch)
        )?;
        writeln!(
            f,
            ">     {} - {} vs {} (configuration descriptor vs HID descriptor)",
            verdict(self.config_matches_hid),
            Length(self.from_config_view),
            Length(self.from_hid_view)
        )
    }
}
