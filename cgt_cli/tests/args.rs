mod common;

use cgt_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use rstest::rstest;
use serde_json::Value;

#[test]
fn args_json_resolves_placeholders() -> AnyEmptyResult {
	let output = common::cgt_cmd()
		.arg("args")
		.arg("--format")
		.arg("json")
		.arg("--")
		.arg("-DROOT=/opt")
		.arg("-I${ROOT}/include")
		.arg("-L${ROOT}/lib")
		.arg("-lm")
		.arg("-Wall")
		.arg("-fPIC")
		.arg("-O2")
		.arg("main.cpp")
		.output()?;

	assert!(output.status.success());
	let json: Value = serde_json::from_slice(&output.stdout)?;

	assert_eq!(json["files"], serde_json::json!(["main.cpp"]));
	assert_eq!(json["defines"]["ROOT"], "/opt");
	assert_eq!(json["header_paths"], serde_json::json!(["/opt/include"]));
	assert_eq!(json["library_paths"], serde_json::json!(["/opt/lib"]));
	assert_eq!(json["libraries"], serde_json::json!(["m"]));
	assert_eq!(json["warnings"], serde_json::json!(["all"]));
	assert_eq!(json["flags"], serde_json::json!(["-fPIC"]));
	assert_eq!(json["compiler_args"], serde_json::json!(["-O2"]));

	Ok(())
}

#[test]
fn args_text_lists_sections() {
	common::cgt_cmd()
		.arg("args")
		.arg("--")
		.arg("-DMODE=fast")
		.arg("-Iinclude")
		.arg("main.cpp")
		.assert()
		.success()
		.stdout(
			predicates::str::contains("Defines")
				.and(predicates::str::contains("MODE"))
				.and(predicates::str::contains("fast"))
				.and(predicates::str::contains("Header paths"))
				.and(predicates::str::contains("include"))
				.and(predicates::str::contains("Files"))
				.and(predicates::str::contains("main.cpp"))
				.and(predicates::str::contains("Libraries").not()),
		);
}

#[rstest]
#[case::include_without_prefix(&["-iwithprefixbefore", "include"], "no prefix specified for `-iwithprefixbefore`")]
#[case::prefix_without_value(&["-iprefix"], "missing value for compiler argument `-iprefix`")]
#[case::include_prefix_without_value(&["-iprefix", "/usr", "-iwithprefixbefore"], "missing value for compiler argument `-iwithprefixbefore`")]
fn args_reports_invalid_arguments(#[case] args: &[&str], #[case] message: &str) {
	common::cgt_cmd()
		.arg("args")
		.arg("--")
		.args(args)
		.assert()
		.code(2)
		.stderr(predicates::str::contains(message));
}
