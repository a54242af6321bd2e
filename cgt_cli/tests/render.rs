mod common;

use cgt_core::AnyEmptyResult;

#[test]
fn render_filters_then_substitutes() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("binding.cpp.in");
	std::fs::write(
		&template,
		"#define greeting Hello\n#ifdef WITH_NAME\n${greeting}, ${name}!\n#else\n${greeting}!\n#endif\n",
	)?;

	let mut cmd = common::cgt_cmd();
	cmd.arg("render")
		.arg(&template)
		.arg("--path")
		.arg(tmp.path())
		.arg("-DWITH_NAME")
		.arg("-Dname=World")
		.assert()
		.success()
		.stdout("Hello, World!\n");

	Ok(())
}

#[test]
fn render_skips_placeholders_in_hidden_branches() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("binding.cpp.in");
	std::fs::write(
		&template,
		"#ifdef WITH_PYTHON\n${python_only}\n#endif\nvoid ${name}();\n",
	)?;

	let mut cmd = common::cgt_cmd();
	cmd.arg("render")
		.arg(&template)
		.arg("--path")
		.arg(tmp.path())
		.arg("-Dname=init")
		.assert()
		.success()
		.stdout("void init();\n");

	Ok(())
}

#[test]
fn render_fails_on_unresolved_placeholders() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("binding.cpp.in");
	std::fs::write(&template, "void ${name}();\n")?;

	let mut cmd = common::cgt_cmd();
	cmd.arg("render")
		.arg(&template)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains(
			"template placeholders not filled: name",
		));

	Ok(())
}

#[test]
fn render_lenient_keeps_unresolved_placeholders() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("binding.cpp.in");
	std::fs::write(&template, "void ${name}();\n")?;

	let mut cmd = common::cgt_cmd();
	cmd.arg("render")
		.arg(&template)
		.arg("--lenient")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("void ${name}();\n");

	Ok(())
}
