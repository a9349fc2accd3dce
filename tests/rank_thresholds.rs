use snooclues::rank::{detective_rank, Rank};

#[test]
fn assigns_ranks_from_points() {
    assert_eq!(detective_rank(0), "Rookie Sleuth");
    assert_eq!(detective_rank(9), "Rookie Sleuth");
    assert_eq!(detective_rank(10), "Junior Detective");
    assert_eq!(detective_rank(49), "Junior Detective");
    assert_eq!(detective_rank(50), "Senior Investigator");
    assert_eq!(detective_rank(99), "Senior Investigator");
    assert_eq!(detective_rank(100), "Lead Profiler");
    assert_eq!(detective_rank(199), "Lead Profiler");
    assert_eq!(detective_rank(200), "Chief of Detectives");
    assert_eq!(detective_rank(1000), "Chief of Detectives");
}

#[test]
fn tiers_are_ordered_and_chained() {
    let mut rank = Rank::RookieSleuth;
    let mut seen = vec![rank];
    while let Some(next) = rank.next() {
        assert!(next.min_score() > rank.min_score());
        assert_eq!(Rank::for_score(next.min_score()), next);
        assert_eq!(Rank::for_score(next.min_score() - 1), rank);
        rank = next;
        seen.push(rank);
    }
    assert_eq!(seen.len(), 5);
    assert_eq!(rank, Rank::ChiefOfDetectives);
}
