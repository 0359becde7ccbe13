use std::error::Error;
use std::fs;
use std::process::{Command, Output};
use tempfile::tempdir;

fn codebreaker_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_codebreaker"))
}

fn run(args: &[&str]) -> Result<Output, Box<dyn Error>> {
    Ok(codebreaker_cmd().args(args).output()?)
}

fn stdout_of(output: Output) -> Result<String, Box<dyn Error>> {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8(output.stdout)?)
}

#[test]
fn hex2b64_command_converts() -> Result<(), Box<dyn Error>> {
    let output = run(&[
        "hex2b64",
        "49276d206b696c6c696e6720796f757220627261696e206c696b65206120706f69736f6e6f7573206d757368726f6f6d",
    ])?;
    assert_eq!(
        stdout_of(output)?.trim(),
        "SSdtIGtpbGxpbmcgeW91ciBicmFpbiBsaWtlIGEgcG9pc29ub3VzIG11c2hyb29t"
    );
    Ok(())
}

#[test]
fn fixed_xor_command_xors() -> Result<(), Box<dyn Error>> {
    let output = run(&[
        "fixed-xor",
        "1c0111001f010100061a024b53535009181c",
        "686974207468652062756c6c277320657965",
    ])?;
    assert_eq!(stdout_of(output)?.trim(), "746865206b696420646f6e277420706c6179");
    Ok(())
}

#[test]
fn fixed_xor_command_rejects_uneven_input() -> Result<(), Box<dyn Error>> {
    let output = run(&["fixed-xor", "00ff", "00"])?;
    assert!(!output.status.success());
    Ok(())
}

#[test]
fn crack_command_finds_key() -> Result<(), Box<dyn Error>> {
    let output = run(&[
        "crack",
        "--charset",
        "prose",
        "1b37373331363f78151b7f2b783431333d78397828372d363c78373e783a393b3736",
    ])?;
    let stdout = stdout_of(output)?;
    assert!(stdout.contains("Cooking MC's like a pound of bacon"));
    Ok(())
}

#[test]
fn generate_then_scan_recovers_line() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let file = dir.path().join("gen.txt");
    let path = file.to_str().unwrap();

    let output = run(&[
        "generate", path, "--lines", "25", "--key", "53", "--seed", "1",
    ])?;
    assert!(stdout_of(output)?.contains("key 53"));
    assert_eq!(fs::read_to_string(&file)?.lines().count(), 25);

    let output = run(&["scan", path])?;
    let stdout = stdout_of(output)?;
    assert!(stdout.contains("53, '5', \"Now that the party is jumping\\n\""));
    Ok(())
}
