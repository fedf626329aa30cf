use crate::catalog::Catalog;
use crate::commands::CmdResult;

/// The catalog's section-by-section debug listing.
pub fn run(catalog: &Catalog) -> CmdResult {
    CmdResult::default().with_dump(catalog.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::book;

    #[test]
    fn dumps_every_section() {
        let catalog = Catalog::build(vec![book("Pro Git", &["git"])]);
        let dump = run(&catalog).dump.unwrap();
        assert!(dump.contains("0 - Section 'My Favorites' (contains 0 books):"));
        assert!(dump.contains("1 - Section 'git' (contains 1 books):"));
        assert!(dump.contains("'Pro Git' by Jane Doe. (git)"));
    }
}
