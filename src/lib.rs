mod parse;

pub mod interval;
pub mod keyboard_mapping;
pub mod mapper;
pub mod math;
pub mod note;
pub mod pitch;
pub mod pitch_class;
pub mod reducer;
pub mod reference;
pub mod scale;
pub mod tuning;
