use crate::config::CypressConfig;
use crate::error::{Error, Result};
use crate::runtime::BindMount;
use std::path::{Path, PathBuf};

/// Translate a host-side path into its container-side path using the active
/// bind mounts. The first bind whose host path prefixes the given path wins.
pub fn resolve_container_path(host_path: &Path, binds: &[BindMount]) -> Result<PathBuf> {
    for bind in binds {
        if let Ok(suffix) = host_path.strip_prefix(&bind.host_path) {
            return Ok(bind.container_path.join(suffix));
        }
    }
    Err(Error::Configuration(format!(
        "could not find a bind mount matching {}",
        host_path.display()
    )))
}

/// Build the shell command the container runs as its entrypoint
///
/// Clause order is fixed: report cleanup (if enabled), dependency install,
/// test run. Flag order within the run clause is fixed too: browser, spec,
/// record/key. The spec filter is double-quoted verbatim; browser and npm
/// arguments are inserted unquoted, so shell quoting is the caller's
/// responsibility.
pub fn build_entrypoint(config: &CypressConfig, binds: &[BindMount]) -> Result<String> {
    let mut command = String::new();

    if config.auto_clean_reports {
        let reports_in_container = resolve_container_path(config.reports_path(), binds)?;
        if reports_in_container == Path::new("/") {
            return Err(Error::Configuration(
                "reports path was /, not allowing to delete everything".to_string(),
            ));
        }
        log::debug!("removing reports from {}", reports_in_container.display());
        command.push_str(&format!("rm -rf {} && ", reports_in_container.display()));
    }

    command.push_str("npm install");
    if let Some(args) = &config.npm_install_args {
        command.push(' ');
        command.push_str(args);
    }

    command.push_str(" && cypress run --headless");
    if let Some(browser) = &config.browser {
        command.push_str(&format!(" --browser {}", browser));
    }
    if let Some(spec) = &config.spec {
        command.push_str(&format!(" --spec \"{}\"", spec));
    }
    if config.record {
        command.push_str(" --record");
        if let Some(key) = &config.record_key {
            command.push_str(&format!(" --key {}", key));
        }
    }

    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binds() -> Vec<BindMount> {
        vec![BindMount::new("e2e", "/e2e")]
    }

    fn bare_config() -> CypressConfig {
        CypressConfig::new().with_auto_clean_reports(false)
    }

    #[test]
    fn test_no_options_builds_bare_command() {
        let command = build_entrypoint(&bare_config(), &binds()).unwrap();
        assert_eq!(command, "npm install && cypress run --headless");
    }

    #[test]
    fn test_cleanup_clause_present_iff_auto_clean_and_first() {
        let command = build_entrypoint(&CypressConfig::new(), &binds()).unwrap();
        assert_eq!(
            command,
            "rm -rf /e2e/cypress/reports/mochawesome && npm install && cypress run --headless"
        );
        let without = build_entrypoint(&bare_config(), &binds()).unwrap();
        assert!(!without.contains("rm -rf"));
    }

    #[test]
    fn test_browser_flag() {
        let config = bare_config().with_browser("firefox").unwrap();
        let command = build_entrypoint(&config, &binds()).unwrap();
        assert_eq!(command, "npm install && cypress run --headless --browser firefox");
    }

    #[test]
    fn test_spec_flag_is_quoted() {
        let config = bare_config().with_spec("a/b.js").unwrap();
        let command = build_entrypoint(&config, &binds()).unwrap();
        assert_eq!(command, "npm install && cypress run --headless --spec \"a/b.js\"");
    }

    #[test]
    fn test_browser_precedes_spec() {
        let config = bare_config()
            .with_browser("firefox")
            .unwrap()
            .with_spec("a/b.js")
            .unwrap();
        let command = build_entrypoint(&config, &binds()).unwrap();
        assert_eq!(
            command,
            "npm install && cypress run --headless --browser firefox --spec \"a/b.js\""
        );
    }

    #[test]
    fn test_record_without_key() {
        let config = bare_config().with_record();
        let command = build_entrypoint(&config, &binds()).unwrap();
        assert_eq!(command, "npm install && cypress run --headless --record");
    }

    #[test]
    fn test_record_with_key() {
        let config = bare_config().with_record_key("K").unwrap();
        let command = build_entrypoint(&config, &binds()).unwrap();
        assert_eq!(command, "npm install && cypress run --headless --record --key K");
    }

    #[test]
    fn test_npm_install_args_appended_verbatim() {
        let config = bare_config().with_npm_install_args("--legacy-peer-deps").unwrap();
        let command = build_entrypoint(&config, &binds()).unwrap();
        assert_eq!(
            command,
            "npm install --legacy-peer-deps && cypress run --headless"
        );
    }

    #[test]
    fn test_all_clauses_in_fixed_order() {
        let config = CypressConfig::new()
            .with_browser("chrome")
            .unwrap()
            .with_spec("cypress/integration/login/**")
            .unwrap()
            .with_record_key("K")
            .unwrap()
            .with_npm_install_args("--no-audit")
            .unwrap();
        let command = build_entrypoint(&config, &binds()).unwrap();
        assert_eq!(
            command,
            "rm -rf /e2e/cypress/reports/mochawesome && npm install --no-audit && \
             cypress run --headless --browser chrome --spec \"cypress/integration/login/**\" \
             --record --key K"
        );
    }

    #[test]
    fn test_reports_path_resolving_to_root_is_rejected() {
        let config = CypressConfig::new().with_mochawesome_reports_at("reports");
        let binds = vec![BindMount::new("reports", "/")];
        let err = build_entrypoint(&config, &binds).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_unmatched_reports_path_is_rejected() {
        let config = CypressConfig::new().with_mochawesome_reports_at("/somewhere/else");
        let err = build_entrypoint(&config, &binds()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_resolve_container_path_joins_suffix() {
        let resolved =
            resolve_container_path(Path::new("e2e/cypress/reports/mochawesome"), &binds()).unwrap();
        assert_eq!(resolved, Path::new("/e2e/cypress/reports/mochawesome"));
    }
}
