// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration for the tripcast chatroom service.
//!
//! Merges compiled defaults, `./tripcast.toml`, and `TRIPCAST_*` environment
//! variables into a [`model::TripcastConfig`], then runs semantic validation
//! on the result.

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::TripcastConfig;

use diagnostic::{figment_to_config_errors, render_errors, ConfigError};

/// Load configuration from the standard location and validate it.
///
/// On failure, renders diagnostics to stderr via `render_errors` before
/// returning the collected errors, matching the binary's startup path.
pub fn load_and_validate() -> Result<TripcastConfig, Vec<ConfigError>> {
    let figment = loader::build_figment();
    match figment.extract::<TripcastConfig>() {
        Ok(config) => validation::validate_config(&config).map(|()| config),
        Err(err) => {
            let errors = figment_to_config_errors(err, &[]);
            render_errors(&errors);
            Err(errors)
        }
    }
}

/// Load configuration from a TOML string and validate it, without touching
/// the filesystem or environment. Used by tests.
pub fn load_and_validate_str(toml_content: &str) -> Result<TripcastConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => validation::validate_config(&config).map(|()| config),
        Err(err) => Err(figment_to_config_errors(
            err,
            &[("<string>".to_string(), toml_content.to_string())],
        )),
    }
}
