//! Scenario — the Dockerfile-variant matrix and the literal expectations
//! every variant must meet.

/// Environment variable the subject application reads to locate its
/// process configuration file.
pub const GUNICORN_CONF_ENV: &str = "GUNICORN_CONF";

/// The overriding configuration file injected into every container.
pub const CUSTOM_CONF_PATH: &str = "/app/custom_gunicorn_conf.py";

/// Port the subject application binds inside the container.
pub const APP_PORT: u16 = 8000;

/// Configuration values the injected file must surface unchanged.
pub const EXPECTED_LOGLEVEL: &str = "warning";
pub const EXPECTED_WORKERS: i64 = 3;
pub const EXPECTED_BIND: &str = "0.0.0.0:8000";

/// Lines that must appear in the combined container logs: the base image's
/// start script detecting and running the prestart hook, and the hook's own
/// output.
pub const EXPECTED_LOG_LINES: [&str; 3] = [
    "Checking for script in /app/prestart.sh",
    "Running script /app/prestart.sh",
    "Running inside /app/prestart.sh, you could add migrations to this file",
];

/// One Dockerfile variant and the exact HTTP root response body its
/// container must serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub dockerfile: &'static str,
    pub expected_body: &'static str,
}

/// The five variants under test, in execution order.
pub const SCENARIOS: [Scenario; 5] = [
    Scenario {
        dockerfile: "python3.6.dockerfile",
        expected_body: "Test app. From Uvicorn with Gunicorn. Using Python 3.6",
    },
    Scenario {
        dockerfile: "python3.7.dockerfile",
        expected_body: "Test app. From Uvicorn with Gunicorn. Using Python 3.7",
    },
    Scenario {
        dockerfile: "latest.dockerfile",
        expected_body: "Test app. From Uvicorn with Gunicorn. Using Python 3.7",
    },
    Scenario {
        dockerfile: "python3.6-alpine3.8.dockerfile",
        expected_body: "Test app. From Uvicorn with Gunicorn. Using Python 3.6",
    },
    Scenario {
        dockerfile: "python3.7-alpine3.8.dockerfile",
        expected_body: "Test app. From Uvicorn with Gunicorn. Using Python 3.7",
    },
];

/// The env assignment injected into every scenario container.
pub fn conf_env_assignment() -> String {
    format!("{}={}", GUNICORN_CONF_ENV, CUSTOM_CONF_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_five_scenarios_with_unique_dockerfiles() {
        let names: HashSet<_> = SCENARIOS.iter().map(|s| s.dockerfile).collect();
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn test_latest_serves_python_3_7_body() {
        let latest = SCENARIOS
            .iter()
            .find(|s| s.dockerfile == "latest.dockerfile")
            .unwrap();
        assert!(latest.expected_body.ends_with("3.7"));
    }

    #[test]
    fn test_expected_bodies_match_variant_python_version() {
        for scenario in &SCENARIOS {
            if scenario.dockerfile.starts_with("python3.6") {
                assert!(
                    scenario.expected_body.ends_with("3.6"),
                    "{} should serve a 3.6 body",
                    scenario.dockerfile
                );
            }
            if scenario.dockerfile.starts_with("python3.7") {
                assert!(
                    scenario.expected_body.ends_with("3.7"),
                    "{} should serve a 3.7 body",
                    scenario.dockerfile
                );
            }
        }
    }

    #[test]
    fn test_conf_env_assignment() {
        assert_eq!(
            conf_env_assignment(),
            "GUNICORN_CONF=/app/custom_gunicorn_conf.py"
        );
    }

    #[test]
    fn test_expected_bind_matches_app_port() {
        assert!(EXPECTED_BIND.ends_with(&APP_PORT.to_string()));
    }
}
