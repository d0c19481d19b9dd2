//! Round-robin scheduling (circle method) with home/away balancing.

use crate::models::{MatchLabel, TournamentError, TournamentFormat};
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

/// One pairing of a round. The home side plays white.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Pairing<T> {
    pub home: T,
    pub away: T,
}

/// A pairing placed in a tournament round, tagged with its group.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct ScheduledPairing<T> {
    pub group: u8,
    pub white: T,
    pub black: T,
}

/// Knockout matches appended after the group stage, in match order per round.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct BracketSkeleton {
    pub semi_final: [MatchLabel; 2],
    pub final_round: [MatchLabel; 2],
}

impl Default for BracketSkeleton {
    fn default() -> Self {
        Self {
            semi_final: [MatchLabel::SF1, MatchLabel::SF2],
            final_round: [MatchLabel::Final, MatchLabel::ThirdPlace],
        }
    }
}

/// Group-stage rounds plus, for group + knockout, the bracket skeleton.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Schedule<T> {
    /// Round `k` of the tournament is `rounds[k - 1]`.
    pub rounds: Vec<Vec<ScheduledPairing<T>>>,
    pub bracket: Option<BracketSkeleton>,
}

/// Circle-method round robin over `competitors`.
///
/// An odd field gets a bye slot; pairings against it are dropped. Each round
/// rotates every competitor but the first one step further, then pairs
/// position `i` with position `n - 1 - i`. The away role goes to the side with
/// fewer away games so far; on equal counts the side at position `i` is home
/// when `round + i` is even.
pub fn round_robin<T>(competitors: &[T]) -> Result<Vec<Vec<Pairing<T>>>, TournamentError>
where
    T: Copy + Eq + Hash,
{
    if competitors.len() < 2 {
        return Err(TournamentError::NotEnoughTeams {
            required: 2,
            actual: competitors.len(),
        });
    }

    let mut slots: Vec<Option<T>> = competitors.iter().copied().map(Some).collect();
    if slots.len() % 2 != 0 {
        slots.push(None);
    }
    let n = slots.len();
    let total_rounds = n - 1;

    let mut away_count: HashMap<T, usize> = competitors.iter().map(|&c| (c, 0)).collect();
    let mut rounds = Vec::with_capacity(total_rounds);

    for round_number in 1..=total_rounds {
        let mut arr = slots.clone();
        arr[1..].rotate_right((round_number - 1) % (n - 1));

        let mut pairings = Vec::with_capacity(n / 2);
        for i in 0..n / 2 {
            let (Some(first), Some(second)) = (arr[i], arr[n - 1 - i]) else {
                continue;
            };
            let first_away = away_count[&first];
            let second_away = away_count[&second];
            let (home, away) = if first_away < second_away {
                (second, first)
            } else if second_away < first_away {
                (first, second)
            } else if (round_number + i) % 2 == 0 {
                (first, second)
            } else {
                (second, first)
            };
            if let Some(count) = away_count.get_mut(&away) {
                *count += 1;
            }
            pairings.push(Pairing { home, away });
        }
        rounds.push(pairings);
    }

    Ok(rounds)
}

/// Build the group-stage schedule for `competitors` under `format`.
///
/// Round robin puts everyone in group 1. Group + knockout needs an even field of
/// at least four: the first half is group 1, the second half group 2, and round
/// `k` bundles round `k` of both groups' schedules.
pub fn generate_schedule<T>(
    competitors: &[T],
    format: TournamentFormat,
) -> Result<Schedule<T>, TournamentError>
where
    T: Copy + Eq + Hash,
{
    let groups: Vec<&[T]> = match format {
        TournamentFormat::RoundRobin => vec![competitors],
        TournamentFormat::GroupKnockout => {
            if competitors.len() < 4 {
                return Err(TournamentError::NotEnoughTeams {
                    required: 4,
                    actual: competitors.len(),
                });
            }
            if competitors.len() % 2 != 0 {
                return Err(TournamentError::OddTeamCount(competitors.len()));
            }
            let (first, second) = competitors.split_at(competitors.len() / 2);
            vec![first, second]
        }
        TournamentFormat::Swiss => return Err(TournamentError::UnsupportedFormat(format)),
    };

    let mut rounds: Vec<Vec<ScheduledPairing<T>>> = Vec::new();
    for (group, members) in (1u8..).zip(groups) {
        for (idx, pairings) in round_robin(members)?.into_iter().enumerate() {
            if rounds.len() <= idx {
                rounds.push(Vec::new());
            }
            rounds[idx].extend(pairings.into_iter().map(|p| ScheduledPairing {
                group,
                white: p.home,
                black: p.away,
            }));
        }
    }

    let bracket = (format == TournamentFormat::GroupKnockout).then(BracketSkeleton::default);
    Ok(Schedule { rounds, bracket })
}
