use serde::Deserialize;

const DEFAULT_MEMORY_WORDS: usize = 32768;
const DEFAULT_START_PC: u16 = 0o1000;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    pub memory: MemoryConfig,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    pub trace_instructions: bool,

    #[serde(default = "default_start_pc")]
    pub start_pc: String,

    #[serde(default = "default_initial_fps")]
    pub initial_fps: String,
}

impl GeneralConfig {
    pub fn start_pc_val(&self) -> u16 {
        parse_octal(&self.start_pc, DEFAULT_START_PC)
    }

    pub fn initial_fps_val(&self) -> u16 {
        parse_octal(&self.initial_fps, 0)
    }
}

#[derive(Debug, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_memory_words")]
    pub size_words: usize,
}

fn parse_octal(s: &str, default: u16) -> u16 {
    let s = s.trim_start_matches("0o");
    u16::from_str_radix(s, 8).unwrap_or(default)
}

fn default_start_pc() -> String {
    "1000".to_string()
}

fn default_initial_fps() -> String {
    "0".to_string()
}

fn default_memory_words() -> usize {
    DEFAULT_MEMORY_WORDS
}
