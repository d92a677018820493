use anyhow::Result;
use clinicdir_core::Rating;
use clinicdir_search::{Facet, JoinPolicy, SearchState, paginate, search};

use crate::cli::{OutputFormat, SearchArgs};
use crate::client::DirectoryClient;
use crate::output::{print_doctor_page, print_doctors, print_json};

/// Builds the applied filter from the command-line flags.
pub fn filter_state(args: &SearchArgs) -> Result<SearchState> {
    let mut state = SearchState::new();
    let pending = state.pending_mut();
    if let Some(raw) = &args.rating {
        pending.rating = Facet::<Rating>::parse_rating(raw)?;
    }
    if let Some(raw) = &args.hospital {
        pending.hospital = Facet::<String>::parse_id(raw);
    }
    if let Some(raw) = &args.department {
        pending.department = Facet::<String>::parse_id(raw);
    }
    if let Some(text) = &args.query {
        pending.text = text.clone();
    }
    state.apply();
    Ok(state)
}

/// Fetches the three collections and runs the search engine locally.
pub async fn search_doctors(
    client: &DirectoryClient,
    args: &SearchArgs,
    format: OutputFormat,
) -> Result<()> {
    let state = filter_state(args)?;
    let policy = if args.strict {
        JoinPolicy::Strict
    } else {
        JoinPolicy::Lax
    };

    let (doctors, hospitals, departments) =
        tokio::try_join!(client.doctors(), client.hospitals(), client.departments())?;

    let results = search(
        &doctors.data,
        &hospitals.data,
        &departments.data,
        state.applied(),
        policy,
    );

    match args.page {
        None => match format {
            OutputFormat::Json => print_json(&results),
            OutputFormat::Table => print_doctors(&results),
        },
        Some(page) => {
            let page = paginate(&results, page, args.page_size)?;
            match format {
                OutputFormat::Json => print_json(&page),
                OutputFormat::Table => print_doctor_page(&page),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_become_the_applied_filter() {
        let args = SearchArgs {
            rating: Some("b".into()),
            hospital: Some("all".into()),
            department: Some("d-rehab".into()),
            query: Some("stroke".into()),
            ..SearchArgs::default()
        };
        let state = filter_state(&args).unwrap();
        assert!(!state.is_dirty());
        let filter = state.applied();
        assert_eq!(filter.rating, Facet::Only(Rating::B));
        assert_eq!(filter.hospital, Facet::All);
        assert_eq!(filter.department, Facet::Only("d-rehab".to_string()));
        assert_eq!(filter.text, "stroke");
    }

    #[test]
    fn no_flags_is_unconstrained() {
        let state = filter_state(&SearchArgs::default()).unwrap();
        assert!(state.applied().is_unconstrained());
    }

    #[test]
    fn bad_rating_is_an_error() {
        let args = SearchArgs {
            rating: Some("E".into()),
            ..SearchArgs::default()
        };
        assert!(filter_state(&args).is_err());
    }
}
