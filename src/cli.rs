use clap::Parser;

/// Download manga chapters from mangapanda and bundle each one into a CBZ.
#[derive(clap::Parser, Debug)]
#[command(version)]
pub struct Cli {
    /// Manga name as displayed on the site, e.g. "One Piece"
    pub manga_name: String,

    /// Download from this chapter to the end of the series
    #[arg(
        short = 's',
        long = "start",
        value_name = "START",
        conflicts_with_all = ["chapter", "end"]
    )]
    pub start: Option<u32>,

    /// Single chapter to download, or the first of a range when END is given
    pub chapter: Option<u32>,

    /// Last chapter of the range, inclusive
    pub end: Option<u32>,
}

impl Cli {
    pub fn new() -> Self {
        Cli::parse()
    }

    /// Resolve the argument forms into an inclusive chapter range.
    /// `None` for the upper bound means "until the site runs out".
    pub fn chapter_range(&self) -> (u32, Option<u32>) {
        if let Some(start) = self.start {
            return (start, None);
        }
        match (self.chapter, self.end) {
            (Some(chapter), None) => (chapter, Some(chapter)),
            (Some(start), Some(end)) => (start, Some(end)),
            _ => (1, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clap_test() {
        use clap::CommandFactory;
        Cli::command().debug_assert()
    }

    #[test]
    fn name_only_downloads_everything() {
        let cli = Cli::try_parse_from(["mangapanda-dl", "One Piece"]).unwrap();
        assert_eq!(cli.chapter_range(), (1, None));
    }

    #[test]
    fn start_flag_is_open_ended() {
        let cli = Cli::try_parse_from(["mangapanda-dl", "One Piece", "-s", "42"]).unwrap();
        assert_eq!(cli.chapter_range(), (42, None));
    }

    #[test]
    fn single_chapter_is_a_closed_range() {
        let cli = Cli::try_parse_from(["mangapanda-dl", "One Piece", "7"]).unwrap();
        assert_eq!(cli.chapter_range(), (7, Some(7)));
    }

    #[test]
    fn two_chapters_are_an_inclusive_range() {
        let cli = Cli::try_parse_from(["mangapanda-dl", "One Piece", "3", "9"]).unwrap();
        assert_eq!(cli.chapter_range(), (3, Some(9)));
    }

    #[test]
    fn start_flag_conflicts_with_positional_range() {
        assert!(Cli::try_parse_from(["mangapanda-dl", "One Piece", "-s", "3", "9"]).is_err());
    }
}
