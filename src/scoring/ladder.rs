use crate::domain::Score;

const POINT_DIVISOR: f64 = 1000.0;

/// Difficulty-weighted point rules of a ladder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LadderScoring {
    pub scoring_floor: i64,
    pub difficulty_scaling: f64,
    pub num_scores_to_count: usize,
}

impl LadderScoring {
    /// `max((score - floor) * difficulty^scaling / 1000, 0)`
    pub fn points(&self, score: i64, difficulty: i32) -> f64 {
        let above_floor = (score - self.scoring_floor) as f64;
        let weight = f64::from(difficulty).powf(self.difficulty_scaling);
        (above_floor * weight / POINT_DIVISOR).max(0.0)
    }

    /// Points for one score, rounded to two decimals
    pub fn score_points(&self, score: &Score) -> f64 {
        round2(self.points(score.score, score.chart.difficulty))
    }

    /// The top `num_scores_to_count` scores ranked by points, with their points
    pub fn counted_scores<'a>(&self, scores: &'a [Score]) -> Vec<(&'a Score, f64)> {
        let mut ranked: Vec<(&Score, f64)> = scores
            .iter()
            .map(|score| (score, self.points(score.score, score.chart.difficulty)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(self.num_scores_to_count);

        ranked
            .into_iter()
            .map(|(score, points)| (score, round2(points)))
            .collect()
    }

    /// Sum of the rounded points of every counted score
    pub fn total(&self, scores: &[Score]) -> f64 {
        self.counted_scores(scores)
            .iter()
            .map(|(_, points)| points)
            .sum()
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::chart;
    use crate::repository::score;

    fn scoring(floor: i64, scores_to_count: usize) -> LadderScoring {
        LadderScoring {
            scoring_floor: floor,
            difficulty_scaling: 2.0,
            num_scores_to_count: scores_to_count,
        }
    }

    #[test]
    fn test_score_at_floor_is_worth_nothing() {
        let ladder = scoring(85000, 20);

        for difficulty in 1..=28 {
            assert_eq!(ladder.points(85000, difficulty), 0.0);
            assert_eq!(ladder.points(60000, difficulty), 0.0);
        }
    }

    #[test]
    fn test_points_increase_with_score_and_difficulty() {
        let ladder = scoring(50000, 20);

        assert!(ladder.points(90000, 20) > ladder.points(89999, 20));
        assert!(ladder.points(90000, 21) > ladder.points(90000, 20));
        assert_eq!(ladder.points(51000, 10), 100.0);
    }

    #[test]
    fn test_total_counts_top_scores_by_points_not_raw_score() {
        let ladder = scoring(0, 2);
        let scores = vec![
            score(1, "Thaya", &chart(1, 1, 20, "wild"), 90000, "2024-11-01"),
            score(2, "Thaya", &chart(2, 2, 22, "wild"), 95000, "2024-11-02"),
            score(3, "Thaya", &chart(3, 3, 25, "wild"), 50000, "2024-11-03"),
        ];

        let counted: Vec<i64> = ladder.counted_scores(&scores).iter().map(|(s, _)| s.id).collect();

        // 22: 45980, 25: 31250, 20: 36000
        assert_eq!(counted, vec![2, 1]);
        assert_eq!(ladder.total(&scores), 45980.0 + 36000.0);

        let heavy_low = vec![
            score(1, "Hamaon", &chart(1, 1, 20, "wild"), 60000, "2024-11-01"),
            score(2, "Hamaon", &chart(2, 2, 26, "wild"), 40000, "2024-11-02"),
        ];
        let top: Vec<i64> = scoring(0, 1)
            .counted_scores(&heavy_low)
            .iter()
            .map(|(s, _)| s.id)
            .collect();
        assert_eq!(top, vec![2]);
    }

    #[test]
    fn test_points_rounded_before_summing() {
        let ladder = LadderScoring {
            scoring_floor: 0,
            difficulty_scaling: 1.5,
            num_scores_to_count: 2,
        };
        let scores = vec![
            score(1, "Thaya", &chart(1, 1, 3, "easy"), 1, "2024-11-01"),
            score(2, "Thaya", &chart(2, 2, 3, "easy"), 1, "2024-11-02"),
        ];

        // 3^1.5 / 1000 = 0.0052 -> 0.01 each
        assert_eq!(ladder.total(&scores), 0.02);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.345678), 12.35);
        assert_eq!(round2(0.004), 0.0);
    }
}
