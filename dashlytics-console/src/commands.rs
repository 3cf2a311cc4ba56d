use anyhow::{bail, Context, Result};
use dashlytics_core::SortOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    CountryRevenue,
    TopProducts,
    MonthlySales,
    TopRegions,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::CountryRevenue,
        ViewKind::TopProducts,
        ViewKind::MonthlySales,
        ViewKind::TopRegions,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "country" | "countries" | "country-revenue" | "revenue" => Some(ViewKind::CountryRevenue),
            "products" | "top-products" => Some(ViewKind::TopProducts),
            "monthly" | "monthly-sales" | "sales" => Some(ViewKind::MonthlySales),
            "regions" | "top-regions" => Some(ViewKind::TopRegions),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ViewKind::CountryRevenue => "country",
            ViewKind::TopProducts => "products",
            ViewKind::MonthlySales => "monthly",
            ViewKind::TopRegions => "regions",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    View(ViewKind),
    Limit(i64),
    /// Field name as typed; resolved against the active view.
    Sort(String),
    /// `None` toggles the current order.
    Order(Option<SortOrder>),
    Next,
    Prev,
    Retry,
    Show,
    /// Render all four views.
    All,
    Notifications,
    Dismiss(u64),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  view <country|products|monthly|regions>   switch the active view
  limit <n>                                 change the row limit (refetches)
  sort <field>                              change the sort field (refetches)
  order [asc|desc]                          set or toggle the sort order (refetches)
  next | prev                               move between pages
  retry                                     fetch again with the current parameters
  show | all                                render the active view / every view
  notifications | dismiss <id>              list or dismiss visible notifications
  help | quit";

/// Blank input yields `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if let Some(extra) = words.next() {
        bail!("unexpected argument `{extra}`");
    }

    let cmd = match (head.to_ascii_lowercase().as_str(), arg) {
        ("view" | "v", Some(name)) => {
            let kind = ViewKind::parse(name).with_context(|| format!("unknown view `{name}`"))?;
            Command::View(kind)
        }
        ("limit" | "l", Some(n)) => {
            let n = n
                .parse::<i64>()
                .with_context(|| format!("limit must be an integer, got `{n}`"))?;
            Command::Limit(n)
        }
        ("sort" | "s", Some(field)) => Command::Sort(field.to_string()),
        ("order" | "o", None) => Command::Order(None),
        ("order" | "o", Some(order)) => {
            let order = SortOrder::from_wire(order)
                .with_context(|| format!("order must be asc or desc, got `{order}`"))?;
            Command::Order(Some(order))
        }
        ("dismiss", Some(id)) => Command::Dismiss(
            id.parse()
                .with_context(|| format!("notification id must be a number, got `{id}`"))?,
        ),
        ("next" | "n", None) => Command::Next,
        ("prev" | "p", None) => Command::Prev,
        ("retry" | "r", None) => Command::Retry,
        ("show", None) => Command::Show,
        ("all", None) => Command::All,
        ("notifications" | "notes", None) => Command::Notifications,
        ("help" | "h" | "?", None) => Command::Help,
        ("quit" | "q" | "exit", None) => Command::Quit,
        ("view" | "v" | "limit" | "l" | "sort" | "s" | "dismiss", None) => {
            bail!("`{head}` needs an argument")
        }
        (_, Some(arg)) if is_bare(head) => bail!("`{head}` takes no argument, got `{arg}`"),
        _ => bail!("unknown command `{head}`, type `help`"),
    };
    Ok(Some(cmd))
}

fn is_bare(head: &str) -> bool {
    matches!(
        head.to_ascii_lowercase().as_str(),
        "next" | "n" | "prev" | "p" | "retry" | "r" | "show" | "all" | "notifications" | "notes"
            | "help" | "h" | "?" | "quit" | "q" | "exit"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("limit 25").unwrap(), Some(Command::Limit(25)));
        assert_eq!(parse("  l -3 ").unwrap(), Some(Command::Limit(-3)));
        assert_eq!(parse("view regions").unwrap(), Some(Command::View(ViewKind::TopRegions)));
        assert_eq!(parse("sort revenue").unwrap(), Some(Command::Sort("revenue".into())));
        assert_eq!(parse("order").unwrap(), Some(Command::Order(None)));
        assert_eq!(
            parse("order DESC").unwrap(),
            Some(Command::Order(Some(SortOrder::Descending)))
        );
        assert_eq!(parse("dismiss 4").unwrap(), Some(Command::Dismiss(4)));
        assert_eq!(parse("Q").unwrap(), Some(Command::Quit));
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_errors_are_descriptive() {
        let err = parse("limit many").unwrap_err().to_string();
        assert!(err.contains("integer"));

        assert!(parse("view nowhere").unwrap_err().to_string().contains("unknown view"));
        assert!(parse("order sideways").is_err());
        assert!(parse("limit").unwrap_err().to_string().contains("needs an argument"));
        assert!(parse("next 2").unwrap_err().to_string().contains("takes no argument"));
        assert!(parse("limit 1 2").is_err());
        assert!(parse("frobnicate").unwrap_err().to_string().contains("unknown command"));
    }

    #[test]
    fn test_view_names_round_trip() {
        for kind in ViewKind::ALL {
            assert_eq!(ViewKind::parse(kind.name()), Some(kind));
        }
    }
}
