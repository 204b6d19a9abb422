//! Disassembly scan for conditional branches.
//!
//! The probes are run through `objdump -d` and every instruction inside a
//! probe function is checked against the conditional branch mnemonics of
//! x86-64 and AArch64. Unconditional jumps, calls, returns and conditional
//! moves are allowed.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::debug;

/// A conditional branch found inside a scanned function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Finding {
    pub(crate) address: String,
    pub(crate) instruction: String,
}

/// Scan result for one function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FunctionScan {
    pub(crate) name: String,
    pub(crate) instructions: usize,
    pub(crate) branches: Vec<Finding>,
}

impl FunctionScan {
    pub(crate) fn is_clean(&self) -> bool {
        self.branches.is_empty()
    }
}

/// Runs the disassembler on `binary` and returns its text output.
pub(crate) fn run_objdump(tool: &Path, binary: &Path) -> Result<String> {
    debug!(tool = %tool.display(), binary = %binary.display(), "running disassembler");

    let output = Command::new(tool)
        .arg("-d")
        .arg("--no-show-raw-insn")
        .arg(binary)
        .output()
        .with_context(|| format!("failed to run {}", tool.display()))?;

    if !output.status.success() {
        bail!(
            "{} exited with {}: {}",
            tool.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parses a function header such as `0000000000012340 <name>:`.
fn function_header(line: &str) -> Option<&str> {
    let (addr, rest) = line.split_once(' ')?;
    if addr.is_empty() || !addr.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    rest.strip_prefix('<')?.strip_suffix(">:")
}

/// Parses an instruction line such as `   12340:\tmov    %edi,%eax`,
/// returning the address and the instruction text.
fn instruction_line(line: &str) -> Option<(&str, &str)> {
    let (addr, rest) = line.trim_start().split_once(':')?;
    if addr.is_empty() || !addr.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    Some((addr, text))
}

/// Raw encoding bytes, printed when the disassembler does not drop them.
fn is_raw_bytes(token: &str) -> bool {
    matches!(token.len(), 2 | 8) && token.chars().all(|c| c.is_ascii_hexdigit())
}

const PREFIXES: &[&str] = &["rep", "repz", "repnz", "repe", "repne", "lock", "notrack", "bnd"];

/// Extracts the lowercase mnemonic, skipping raw bytes and prefixes.
fn mnemonic(text: &str) -> Option<String> {
    text.split_whitespace()
        .skip_while(|t| is_raw_bytes(t))
        .map(|t| t.to_ascii_lowercase())
        .find(|t| !PREFIXES.contains(&t.as_str()))
}

/// Whether `mnemonic` transfers control depending on flags or a register.
pub(crate) fn is_conditional_branch(mnemonic: &str) -> bool {
    // x86-64: jcc, jrcxz, loop*
    if mnemonic.starts_with('j') {
        return !mnemonic.starts_with("jmp");
    }
    if mnemonic.starts_with("loop") {
        return true;
    }
    // AArch64: b.cond, bc.cond, compare/test-and-branch
    mnemonic.starts_with("b.")
        || mnemonic.starts_with("bc.")
        || matches!(mnemonic, "cbz" | "cbnz" | "tbz" | "tbnz")
}

/// Splits `objdump -d` output into functions and scans those whose symbol
/// starts with `prefix`. A single leading underscore, as emitted on Mach-O,
/// is ignored when matching.
pub(crate) fn scan(disassembly: &str, prefix: &str) -> Vec<FunctionScan> {
    let mut scans = Vec::new();
    let mut current: Option<FunctionScan> = None;

    for line in disassembly.lines() {
        if let Some(name) = function_header(line) {
            scans.extend(current.take());
            let bare = name.strip_prefix('_').unwrap_or(name);
            if bare.starts_with(prefix) || name.starts_with(prefix) {
                current = Some(FunctionScan {
                    name: bare.to_owned(),
                    instructions: 0,
                    branches: Vec::new(),
                });
            }
            continue;
        }

        let Some(func) = current.as_mut() else {
            continue;
        };
        let Some((address, text)) = instruction_line(line) else {
            continue;
        };
        let Some(op) = mnemonic(text) else {
            continue;
        };

        func.instructions += 1;
        if is_conditional_branch(&op) {
            func.branches.push(Finding {
                address: address.to_owned(),
                instruction: text.to_owned(),
            });
        }
    }
    scans.extend(current);

    scans
}

#[cfg(test)]
mod tests {
    use super::*;

    const X86_SAMPLE: &str = "
target/release/ctcheck:     file format elf64-x86-64


Disassembly of section .text:

0000000000012340 <ctcheck_probe_eq_u8>:
   12340:\tmov    %edi,%eax
   12342:\txor    %esi,%eax
   12344:\tneg    %al
   12346:\tsbb    %eax,%eax
   12348:\tret

0000000000012350 <ctcheck_probe_le_u8>:
   12350:\tcmp    %sil,%dil
   12353:\tjbe    12360 <ctcheck_probe_le_u8+0x10>
   12355:\txor    %eax,%eax
   12357:\tret

0000000000012360 <unrelated_helper>:
   12360:\tjne    12370 <unrelated_helper+0x10>
   12362:\tret
";

    const AARCH64_SAMPLE: &str = "
0000000000001000 <_ctcheck_probe_select_u64>:
    1000:\tasr\tw8, w0, #31
    1004:\tsxtw\tx8, w8
    1008:\tbic\tx9, x2, x8
    100c:\tand\tx8, x1, x8
    1010:\torr\tx0, x8, x9
    1014:\tret

0000000000001020 <_ctcheck_probe_swap_u64>:
    1020:\ttbz\tw0, #31, 1030 <_ctcheck_probe_swap_u64+0x10>
    1024:\tb\t1030 <_ctcheck_probe_swap_u64+0x10>
    1028:\tret
";

    #[test]
    fn test_scan_x86_finds_jcc() {
        let scans = scan(X86_SAMPLE, "ctcheck_probe_");
        assert_eq!(scans.len(), 2);

        assert_eq!(scans[0].name, "ctcheck_probe_eq_u8");
        assert_eq!(scans[0].instructions, 5);
        assert!(scans[0].is_clean());

        assert_eq!(scans[1].name, "ctcheck_probe_le_u8");
        assert_eq!(scans[1].instructions, 4);
        assert_eq!(
            scans[1].branches,
            vec![Finding {
                address: "12353".into(),
                instruction: "jbe    12360 <ctcheck_probe_le_u8+0x10>".into(),
            }]
        );
    }

    #[test]
    fn test_scan_aarch64_strips_underscore() {
        let scans = scan(AARCH64_SAMPLE, "ctcheck_probe_");
        assert_eq!(scans.len(), 2);
        assert_eq!(scans[0].name, "ctcheck_probe_select_u64");
        assert!(scans[0].is_clean());
        assert_eq!(scans[1].branches.len(), 1);
        assert_eq!(scans[1].branches[0].address, "1020");
    }

    #[test]
    fn test_scan_ignores_other_functions() {
        let scans = scan(X86_SAMPLE, "no_such_prefix");
        assert!(scans.is_empty());
    }

    #[test]
    fn test_raw_bytes_are_skipped() {
        assert_eq!(
            mnemonic("48 89 f8             \tmov    %rdi,%rax").as_deref(),
            Some("mov")
        );
        assert_eq!(mnemonic("54000040 \tb.eq\t1010").as_deref(), Some("b.eq"));
        assert_eq!(mnemonic("f3 c3 \trepz ret").as_deref(), Some("ret"));
    }

    #[test]
    fn test_conditional_branch_mnemonics() {
        for m in ["je", "jne", "jb", "jae", "jrcxz", "loopne", "b.ne", "bc.eq", "cbz", "tbnz"] {
            assert!(is_conditional_branch(m), "{m}");
        }
        for m in ["jmp", "jmpq", "call", "ret", "cmovne", "sbb", "b", "bl", "br", "csel", "csetm"] {
            assert!(!is_conditional_branch(m), "{m}");
        }
    }

    #[test]
    fn test_header_parsing() {
        assert_eq!(function_header("0000000000012340 <foo>:"), Some("foo"));
        assert_eq!(function_header("Disassembly of section .text:"), None);
        assert_eq!(instruction_line("   12340:\tret"), Some(("12340", "ret")));
        assert_eq!(instruction_line("   12340:"), None);
    }
}
