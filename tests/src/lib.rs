//! End-to-end scenarios wiring the engine to scripted devices.

mod backup;
mod bootstrap;
mod lab;
mod scan;
