// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod coerce;
pub mod forms;
pub mod gateway;
pub mod model;
pub mod state;

pub use coerce::*;
pub use forms::*;
pub use gateway::*;
pub use model::*;
pub use state::*;
