use std::io::{self, BufRead, Write};

/// Ask a yes/no question. Only `y` (any case) counts as yes; end of input is no.
pub fn confirm<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> io::Result<bool> {
    write!(output, "{} (y/n): ", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

pub fn confirm_stdin(prompt: &str) -> bool {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();
    confirm(prompt, &mut input, &mut stdout).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(answer: &str) -> bool {
        let mut out = Vec::new();
        let yes = confirm("Continue?", &mut Cursor::new(answer), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Continue? (y/n): ");
        yes
    }

    #[test]
    fn test_confirm_answers() {
        assert!(ask("y\n"));
        assert!(ask("Y\n"));
        assert!(ask("  y  \n"));
        assert!(!ask("yes\n"));
        assert!(!ask("n\n"));
        assert!(!ask(""));
    }
}
