//! ASCII logo revealed through the matrix rain.

/// Block-letter wordmark, faded in behind the rain. Blank cells inside the
/// logo stay transparent to the rain.
pub const CORTEX_LOGO: &str = r"
 ██████╗ ██████╗ ██████╗ ████████╗███████╗██╗  ██╗
██╔════╝██╔═══██╗██╔══██╗╚══██╔══╝██╔════╝╚██╗██╔╝
██║     ██║   ██║██████╔╝   ██║   █████╗   ╚███╔╝
██║     ██║   ██║██╔══██╗   ██║   ██╔══╝   ██╔██╗
╚██████╗╚██████╔╝██║  ██║   ██║   ███████╗██╔╝ ██╗
 ╚═════╝ ╚═════╝ ╚═╝  ╚═╝   ╚═╝   ╚══════╝╚═╝  ╚═╝
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logo_fits_standard_terminal() {
        for line in CORTEX_LOGO.lines() {
            assert!(line.chars().count() <= 80, "logo line wider than 80 columns");
        }
        assert!(CORTEX_LOGO.lines().count() <= 24);
    }
}
