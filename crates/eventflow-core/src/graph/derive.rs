//! Turns raw `(actor, location, date)` observations into visit edges.

use crate::data::{ActorId, Edge, EdgeId, Triple};

/// Sorts `actor`'s observations chronologically and connects each one to the
/// next. Observations of other actors are ignored; observations sharing a
/// date keep their input order.
pub fn edges_from_triples<'a, I>(actor: ActorId, triples: I) -> Vec<Edge>
where
    I: IntoIterator<Item = &'a Triple>,
{
    let mut observations: Vec<&Triple> = triples.into_iter().filter(|t| t.actor == actor).collect();
    observations.sort_by_key(|t| t.date);

    observations
        .windows(2)
        .zip(0u32..)
        .map(|(pair, seq)| {
            Edge::new(
                EdgeId::new(actor, seq),
                pair[0].location,
                pair[0].date,
                pair[1].location,
                pair[1].date,
            )
        })
        .collect()
}
