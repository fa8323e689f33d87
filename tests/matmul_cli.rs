use std::process::{Command, Output};

fn matmul(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_matmul"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to spawn matmul")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn prints_three_labelled_rows_per_matrix() {
    let out = matmul(&["3", "1", "1"]);
    assert_eq!(out.status.code(), Some(0));
    let text = stdout(&out);

    let rows: Vec<&str> = text.lines().filter(|l| l.starts_with("Row ")).collect();
    assert_eq!(rows.len(), 9);
    for row in &rows {
        let values: Vec<&str> = row.trim_end_matches('\t').split('\t').skip(1).collect();
        assert_eq!(values.len(), 3, "{row:?}");
        for v in values {
            let decimals = v.split('.').nth(1).expect("two-decimal value");
            assert_eq!(decimals.len(), 2);
        }
    }
    assert!(text.contains("Matrix a[n][n]:"));
    assert!(text.contains("Matrix b[n][n]:"));
    assert!(text.contains("Output matrix:"));
    // C[0][0] = 10*10 + 11*11 + 12*12
    assert!(text.contains("Row 1:\t365.00\t"));
}

#[test]
fn reports_cores_threads_and_runtime() {
    for version in ["1", "2", "3", "4"] {
        let out = matmul(&["32", version]);
        assert_eq!(out.status.code(), Some(0));
        let text = stdout(&out);
        assert!(text.contains("logical cores."));
        assert!(text.contains("threads"));
        let runtime = text
            .lines()
            .find(|l| l.starts_with("Program runs in "))
            .expect("runtime line");
        assert!(runtime.ends_with(" seconds"));
        assert!(!text.contains("Row "));
    }
}

#[test]
fn large_n_is_never_printed() {
    let out = matmul(&["16", "2", "1"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(!stdout(&out).contains("Row "));
}

#[test]
fn invalid_arguments_exit_with_one() {
    for args in [
        &["0", "1"][..],
        &["-5", "1"][..],
        &["10", "5"][..],
        &["10"][..],
        &[][..],
        &["abc", "1"][..],
    ] {
        let out = matmul(args);
        assert_eq!(out.status.code(), Some(1), "{args:?}");
        assert!(stdout(&out).contains("Arguments:"), "{args:?}");
    }
    assert!(stdout(&matmul(&["0", "1"])).contains("Matrix size must be larger than 0"));
    assert!(stdout(&matmul(&["10", "5"])).contains("Version must be 1, 2, 3, or 4"));
}
