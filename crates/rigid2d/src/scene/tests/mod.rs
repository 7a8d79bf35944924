//! Multi-tick scenarios run through the full pipeline

mod scenario;
