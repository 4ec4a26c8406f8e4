use std::cmp::Ordering;

use crate::entities::movie;

/// Orders movies by descending rating and numbers the rated ones from 1.
///
/// The sort is stable, so movies with equal ratings keep their input order;
/// callers pass movies in id order to break ties by insertion. Unrated movies
/// go last and get no ranking.
pub fn assign_rankings(mut movies: Vec<movie::Model>) -> Vec<movie::Model> {
    movies.sort_by(|a, b| by_rating_desc(a.rating, b.rating));

    let mut next = 1;
    for movie in &mut movies {
        movie.ranking = movie.rating.map(|_| {
            let rank = next;
            next += 1;
            rank
        });
    }

    movies
}

fn by_rating_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
