//! Integration tests for stack-lookup

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    /// Binary isolated from the user's global and project config
    fn lookup(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("stack-lookup");
        cmd.current_dir(temp.path())
            .env_remove("STACK_LOOKUP_CACHE")
            .arg("--no-local")
            .arg("--config")
            .arg(temp.path().join("config.toml"));
        cmd
    }

    fn write_cache(path: &Path, json: &str) {
        std::fs::write(path, json).unwrap();
    }

    fn read_cache(path: &Path) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        lookup(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("CloudFormation outputs"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        lookup(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("stack-lookup"));
    }

    #[test]
    fn output_served_from_cache() {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join("cdk8s.context.json");
        write_cache(&cache, r#"{"cf:123:us-east-1:myStack:someOutput": "mockValue"}"#);

        lookup(&temp)
            .args(["--cache-file"])
            .arg(&cache)
            .args([
                "output",
                "--account",
                "123",
                "--region",
                "us-east-1",
                "--stack",
                "myStack",
                "someOutput",
            ])
            .assert()
            .success()
            .stdout("mockValue\n");
    }

    #[test]
    fn default_cache_file_is_in_working_directory() {
        let temp = TempDir::new().unwrap();
        write_cache(
            &temp.path().join("cdk8s.context.json"),
            r#"{"ssm:123:eu-west-1:/app/db": "postgres://db"}"#,
        );

        lookup(&temp)
            .args(["parameter", "-a", "123", "-r", "eu-west-1", "/app/db", "--json"])
            .assert()
            .success()
            .stdout("\"postgres://db\"\n");
    }

    #[cfg(unix)]
    #[test]
    fn miss_runs_process_delegate_and_persists() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("config.toml"),
            r#"
[fetch]
backend = "process"
output_command = ['sh', '-c', 'printf "\"%s-%s-%s-%s\"" "$1" "$2" "$3" "$4"', 'sh']
"#,
        )
        .unwrap();
        let cache = temp.path().join("cdk8s.context.json");
        assert!(!cache.exists());

        lookup(&temp)
            .args([
                "output", "-a", "123", "-r", "us-east-1", "-s", "myStack", "newOutput",
            ])
            .assert()
            .success()
            .stdout("123-us-east-1-myStack-newOutput\n");

        assert_eq!(
            read_cache(&cache)["cf:123:us-east-1:myStack:newOutput"],
            "123-us-east-1-myStack-newOutput"
        );
    }

    #[cfg(unix)]
    #[test]
    fn delegate_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("config.toml"),
            r#"
[fetch]
backend = "process"
parameter_command = ['sh', '-c', 'echo "Unable to find parameter $3" >&2; exit 1', 'sh']
"#,
        )
        .unwrap();

        lookup(&temp)
            .args(["parameter", "-a", "123", "-r", "us-east-1", "/missing"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unable to find parameter /missing"));

        assert!(!temp.path().join("cdk8s.context.json").exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn builtin_fetch_child_uses_callers_config() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("config.toml"),
            r#"
[aws]
role_arn_template = "arn:aws:iam::{account}:role/from-caller-config-{region}"

[fetch]
backend = "process"
"#,
        )
        .unwrap();

        // A broken default config that the child must not pick up
        let xdg = temp.path().join("xdg");
        std::fs::create_dir_all(xdg.join("stack-lookup")).unwrap();
        std::fs::write(
            xdg.join("stack-lookup").join("config.toml"),
            "[fetch]\nbackend = \"bogus\"\n",
        )
        .unwrap();

        // No credentials anywhere, so the child fails fast after trying the role
        lookup(&temp)
            .env("XDG_CONFIG_HOME", &xdg)
            .env("AWS_EC2_METADATA_DISABLED", "true")
            .env("AWS_CONFIG_FILE", temp.path().join("aws-config"))
            .env("AWS_SHARED_CREDENTIALS_FILE", temp.path().join("aws-credentials"))
            .env_remove("AWS_PROFILE")
            .env_remove("AWS_ACCESS_KEY_ID")
            .env_remove("AWS_SECRET_ACCESS_KEY")
            .env_remove("AWS_SESSION_TOKEN")
            .env_remove("AWS_WEB_IDENTITY_TOKEN_FILE")
            .env_remove("AWS_ROLE_ARN")
            .env_remove("AWS_CONTAINER_CREDENTIALS_RELATIVE_URI")
            .env_remove("AWS_CONTAINER_CREDENTIALS_FULL_URI")
            .args(["output", "-a", "123", "-r", "us-east-1", "-s", "s", "o"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--no-local fetch output"))
            .stderr(predicate::str::contains("role/from-caller-config-us-east-1"))
            .stderr(predicate::str::contains("unknown variant").not());

        assert!(!temp.path().join("cdk8s.context.json").exists());
    }

    #[test]
    fn invalid_output_name_rejected() {
        let temp = TempDir::new().unwrap();
        lookup(&temp)
            .args(["output", "-a", "123", "-r", "us-east-1", "-s", "s", "bad:name"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("must not contain ':'"));
    }

    #[test]
    fn cache_list_empty_json() {
        let temp = TempDir::new().unwrap();
        lookup(&temp)
            .args(["cache", "list", "--format", "json"])
            .assert()
            .success()
            .stdout("[]\n");
    }

    #[test]
    fn cache_list_plain() {
        let temp = TempDir::new().unwrap();
        write_cache(
            &temp.path().join("cdk8s.context.json"),
            r#"{"ssm:1:r:/b": "two", "cf:1:r:s:a": "one"}"#,
        );

        lookup(&temp)
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout("cf:1:r:s:a=one\nssm:1:r:/b=two\n");
    }

    #[test]
    fn cache_path_honours_flag() {
        let temp = TempDir::new().unwrap();
        lookup(&temp)
            .args(["--cache-file", "lookups/cache.json", "cache", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("lookups/cache.json"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        lookup(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        lookup(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"));
    }

    #[test]
    fn config_set_then_show() {
        let temp = TempDir::new().unwrap();
        lookup(&temp)
            .args(["config", "set", "aws.profile", "lookups"])
            .assert()
            .success();

        lookup(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("profile = \"lookups\""));
    }

    #[test]
    fn completions_generate() {
        let temp = TempDir::new().unwrap();
        lookup(&temp)
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("stack-lookup"));
    }
}
