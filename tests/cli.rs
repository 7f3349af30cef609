#[cfg(test)]
mod cli_tests {
    use std::io::Write;
    use std::path::PathBuf;
    use std::process::{Command, Output, Stdio};

    fn source_file(tag: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "kaleido-cli-{}-{}.ks",
            tag,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn kaleido(args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_kaleido"))
            .args(args)
            .output()
            .unwrap()
    }

    fn stdout(output: &Output) -> String {
        String::from_utf8(output.stdout.clone()).unwrap()
    }

    #[test]
    fn test_tokenize_prints_each_token() {
        let path = source_file("tokens", "def f(x) 2");
        let output = kaleido(&["tokenize", path.to_str().unwrap()]);

        assert!(output.status.success());
        assert_eq!(
            stdout(&output),
            "DEF def null\n\
             IDENTIFIER f null\n\
             UNKNOWN ( null\n\
             IDENTIFIER x null\n\
             UNKNOWN ) null\n\
             NUMBER 2 2.0\n\
             EOF  null\n"
        );

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_tokenize_lex_error_exits_65() {
        let path = source_file("badnum", "1.2.3 x");
        let output = kaleido(&["tokenize", path.to_str().unwrap()]);

        assert_eq!(output.status.code(), Some(65));

        let err = String::from_utf8(output.stderr.clone()).unwrap();
        assert!(
            err.contains("[line 1, column 1] Error: Invalid number literal: 1.2.3"),
            "stderr: {}",
            err
        );

        // Scanning continues past the bad literal.
        assert_eq!(stdout(&output), "IDENTIFIER x null\nEOF  null\n");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_tokenize_json_one_object_per_line() {
        let path = source_file("json", "extern sin");
        let output = kaleido(&["tokenize", "--json", path.to_str().unwrap()]);

        assert!(output.status.success());

        let lines: Vec<serde_json::Value> = stdout(&output)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["kind"], "Extern");
        assert_eq!(lines[0]["lexeme"], "extern");
        assert_eq!(lines[1]["kind"], "Identifier");
        assert_eq!(lines[1]["column"], 8);
        assert_eq!(lines[2]["kind"], "Eof");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_dash_reads_stdin() {
        let mut child = Command::new(env!("CARGO_BIN_EXE_kaleido"))
            .args(["tokenize", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();

        child
            .stdin
            .take()
            .unwrap()
            .write_all(b"extern # from stdin\n")
            .unwrap();

        let output = child.wait_with_output().unwrap();

        assert!(output.status.success());
        assert_eq!(stdout(&output), "EXTERN extern null\nEOF  null\n");
    }

    #[test]
    fn test_peek_prints_first_token_code() {
        let path = source_file("peek", "def foo(x) x");
        let name = path.to_str().unwrap();
        let output = kaleido(&["peek", name]);

        assert!(output.status.success());
        assert_eq!(
            stdout(&output),
            format!("Going to parse source '{}'\ngot token -2\n", name)
        );

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_peek_unknown_character_code() {
        let path = source_file("peek-unknown", "  ;");
        let output = kaleido(&["peek", path.to_str().unwrap()]);

        assert!(output.status.success());
        assert!(stdout(&output).ends_with("got token 59\n"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_backtrace_prints_frames() {
        let output = kaleido(&["backtrace"]);

        assert!(output.status.success());

        let text = stdout(&output);
        assert!(!text.is_empty());

        for line in text.lines() {
            assert!(line.starts_with("ip = "), "unexpected line {:?}", line);
        }
    }
}
