//! Plug-in identity and host log messages.

/// Id shared by the reader and writer.
pub const PLUGIN_ID: u32 = 87062;

pub const TYPE_NAME: &str = "FLUMORE";
pub const KEYWORD: &str = "FLUMORE";

pub const MSG_NO_PARAMETER: &str = "No FLUMORE parameter was specified in the mapping file";
pub const MSG_WRITE_ERROR: &str = "Error writing feature geometry";

pub fn opening_reader(dataset: &str) -> String {
    format!("Opening FLUMORE reader on dataset '{dataset}'")
}

pub fn closing_reader(dataset: &str) -> String {
    format!("Closing FLUMORE reader on dataset '{dataset}'")
}

pub fn opening_writer(dataset: &str) -> String {
    format!("Opening FLUMORE writer on dataset '{dataset}'")
}

pub fn closing_writer(dataset: &str) -> String {
    format!("Closing FLUMORE writer on dataset '{dataset}'")
}

pub fn parameter_value(tag: &str, value: &str) -> String {
    format!("{tag}: {value}")
}
