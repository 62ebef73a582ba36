//! Small helpers shared by the record and directory layers

pub mod string;
