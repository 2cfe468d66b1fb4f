//! Integration tests for the ranking pipeline.
//!
//! These tests run the sample catalog through feature extraction,
//! similarity scoring and ranking, the way the server does per request.

use data_loader::{Catalog, CatalogRepository, FileRepository};
use features::Features;
use pipeline::{ExclusionPolicy, ProfileRanker, RankingConfig, RankingContext, rank_neighbors};
use similarity::{NeighborIndex, NeighborQuery, NeighborSearch, ProfileSimilarity};
use std::path::PathBuf;
use std::sync::Arc;

const USER: &str = "5f1a0c2e9b1d4a0012345678";

struct Setup {
    repository: FileRepository,
    catalog: Arc<Catalog>,
    profile: ProfileSimilarity,
    neighbors: NeighborSearch,
}

fn create_test_setup() -> Setup {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/sample");
    let repository = FileRepository::open(dir).unwrap();

    let catalog = Arc::new(Catalog::from_records(repository.fetch_all_movies().unwrap()).unwrap());
    let features = Features::extract(&catalog);

    let profile = ProfileSimilarity::new(catalog.clone(), Arc::new(features.profile));
    let neighbors = NeighborSearch::new(
        catalog.clone(),
        Arc::new(NeighborIndex::build(features.combined)),
    );

    Setup {
        repository,
        catalog,
        profile,
        neighbors,
    }
}

fn engaged_ids(setup: &Setup, user_id: &str) -> Vec<u32> {
    setup
        .repository
        .fetch_user_engaged_ids(user_id)
        .unwrap()
        .iter()
        .map(|engaged| engaged.movie_id)
        .collect()
}

#[test]
fn test_profile_recommendations_respect_rules() {
    let setup = create_test_setup();
    let engaged = engaged_ids(&setup, USER);
    assert_eq!(engaged, vec![1, 4, 7]);

    let scores = setup.profile.score(&engaged).unwrap();
    let context = RankingContext::new(USER).with_profile(engaged.iter().copied());

    let ranker = ProfileRanker::new(setup.catalog.clone(), &RankingConfig::default());
    let items = ranker.rank(&scores, &context).unwrap();

    assert_eq!(items.len(), 10);
    for item in &items {
        let movie = setup.catalog.get_movie(item.movie_id).unwrap();
        assert!(movie.rating > 5.0, "{} is below the rating bar", movie.title);
        assert!(movie.vote_count > 1000, "{} has too few votes", movie.title);
        assert_ne!(item.movie_id, 1, "query movie of the first row came back");
    }

    // Twelve movies pass the filters for the first row, so all ten come from it
    assert!(
        items
            .windows(2)
            .all(|pair| pair[0].similarity >= pair[1].similarity)
    );
}

#[test]
fn test_profile_exclusion_policy() {
    let setup = create_test_setup();
    let engaged = engaged_ids(&setup, USER);

    let scores = setup.profile.score(&engaged).unwrap();
    let context = RankingContext::new(USER).with_profile(engaged.iter().copied());

    let config = RankingConfig::default().with_exclusion(ExclusionPolicy::Profile);
    let ranker = ProfileRanker::new(setup.catalog.clone(), &config);
    let items = ranker.rank(&scores, &context).unwrap();

    assert_eq!(items.len(), 10);
    assert!(items.iter().all(|item| !engaged.contains(&item.movie_id)));
}

#[test]
fn test_unknown_user_has_no_match() {
    let setup = create_test_setup();

    assert!(engaged_ids(&setup, "nobody").is_empty());
    assert!(setup.profile.score(&[]).is_err());

    // Engagements that only reference missing movies
    let ghost = engaged_ids(&setup, "ghost-user");
    assert_eq!(ghost, vec![999]);
    assert!(setup.profile.score(&ghost).is_err());
}

#[test]
fn test_neighbor_recommendations() {
    let setup = create_test_setup();

    let neighbors = setup
        .neighbors
        .search(&NeighborQuery::Title("alien".to_string()))
        .unwrap();
    let items = rank_neighbors(&setup.catalog, &neighbors);

    assert_eq!(items.len(), 6);
    assert_eq!(items[0].title, "Alien");
    assert_eq!(items[0].similarity, 1.0);
    assert!(
        items
            .windows(2)
            .all(|pair| pair[0].similarity >= pair[1].similarity)
    );

    let by_id = setup.neighbors.search(&NeighborQuery::Id(4)).unwrap();
    assert_eq!(by_id, neighbors);
}
