//! 统计引擎
//!
//! 纯函数实现，无 I/O、无随机、无时钟：同样的输入永远得到同样的输出。
//! 排序规则全局一致，计数降序、同数按名称升序（再按 ID 升序兜底），
//! 因此打乱输入顺序不会改变任何排行或分布的顺序。
//! 未记录的可选数值一律按缺席处理（不参与平均），绝不折算成 0。

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;

use crate::journal::action::models::TimelineAction;
use crate::journal::companion::models::Companion;
use crate::journal::stats::models::{
    ActionFilter, ActionStatistics, AreaStat, AttractionRank, CompanionRank, MonthBucket,
    RestaurantRank, VisitFilter, VisitStatistics, YearBucket,
};
use crate::journal::types::{ActionCategory, Area};
use crate::journal::visit::models::Visit;

/// 排行榜长度上限
pub const TOP_RANKING_LIMIT: usize = 10;

/// value / total * 100，四舍五入到一位小数；total 为 0 时恒为 0，不会除零
fn percentage(value: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (value as f64 / total as f64 * 1000.0).round() / 10.0
}

fn visit_matches(visit: &Visit, filter: &VisitFilter) -> bool {
    if let Some(start) = filter.start_date {
        if visit.date < start {
            return false;
        }
    }
    if let Some(end) = filter.end_date {
        if visit.date > end {
            return false;
        }
    }
    if let Some(park) = filter.park {
        if visit.park != park {
            return false;
        }
    }
    if !filter.companion_ids.is_empty()
        && !filter
            .companion_ids
            .iter()
            .any(|id| visit.companion_ids.contains(id))
    {
        return false;
    }
    true
}

fn action_matches(action: &TimelineAction, filter: &ActionFilter) -> bool {
    if let Some(visit_id) = &filter.visit_id {
        if &action.visit_id != visit_id {
            return false;
        }
    }
    if let Some(category) = filter.category {
        if action.category() != category {
            return false;
        }
    }
    if let Some(area) = filter.area {
        if action.area != area {
            return false;
        }
    }
    let date = action.time.date();
    if let Some(start) = filter.start_date {
        if date < start {
            return false;
        }
    }
    if let Some(end) = filter.end_date {
        if date > end {
            return false;
        }
    }
    if let Some(needle) = &filter.location_contains {
        if !action.location_name.contains(needle.as_str()) {
            return false;
        }
    }
    true
}

/// 计算游园维度统计
///
/// 伙伴排行只统计能在 `companions` 里找到名称的 ID，悬空 ID 跳过；
/// 月度/年度分布只收有记录的桶，不为空档补零。
pub fn compute_visit_statistics(
    visits: &[Visit],
    companions: &[Companion],
    filter: &VisitFilter,
) -> VisitStatistics {
    let filtered: Vec<&Visit> = visits.iter().filter(|v| visit_matches(v, filter)).collect();

    let mut count_by_park = BTreeMap::new();
    for v in &filtered {
        *count_by_park.entry(v.park).or_insert(0u64) += 1;
    }

    let durations: Vec<i64> = filtered.iter().filter_map(|v| v.duration_minutes()).collect();
    let average_duration_minutes = if durations.is_empty() {
        None
    } else {
        Some(durations.iter().sum::<i64>() as f64 / durations.len() as f64)
    };

    let names: BTreeMap<&str, &str> = companions
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();
    let mut shared: BTreeMap<&str, u64> = BTreeMap::new();
    for v in &filtered {
        // 同一次游园里重复出现的伙伴 ID 只算一次同行
        let unique: BTreeSet<&str> = v.companion_ids.iter().map(String::as_str).collect();
        for id in unique {
            *shared.entry(id).or_insert(0) += 1;
        }
    }
    let mut companion_ranking: Vec<CompanionRank> = shared
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .filter_map(|(id, count)| {
            names.get(id).map(|name| CompanionRank {
                companion_id: id.to_string(),
                name: (*name).to_string(),
                count,
            })
        })
        .collect();
    companion_ranking.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.companion_id.cmp(&b.companion_id))
    });

    let mut by_month: BTreeMap<String, u64> = BTreeMap::new();
    let mut by_year: BTreeMap<i32, u64> = BTreeMap::new();
    for v in &filtered {
        *by_month
            .entry(v.date.format("%Y-%m").to_string())
            .or_insert(0) += 1;
        *by_year.entry(v.date.year()).or_insert(0) += 1;
    }

    VisitStatistics {
        total_visits: filtered.len() as u64,
        count_by_park,
        average_duration_minutes,
        companion_ranking,
        visits_by_month: by_month
            .into_iter()
            .map(|(month, count)| MonthBucket { month, count })
            .collect(),
        visits_by_year: by_year
            .into_iter()
            .map(|(year, count)| YearBucket { year, count })
            .collect(),
    }
}

#[derive(Default)]
struct LocationAgg {
    count: u64,
    wait_sum: i64,
    wait_samples: u64,
}

#[derive(Default)]
struct AreaAgg {
    count: u64,
    minutes_sum: i64,
    minutes_samples: u64,
}

/// 计算活动维度统计
///
/// 等待/时长平均只取有记录的样本；某地点一次等待都没记过时
/// 平均等待缺席而不是 0。场均活动数以筛选集中不同的 visit_id
/// 数为分母，分母为 0 时结果为 0.0。
pub fn compute_action_statistics(
    actions: &[TimelineAction],
    filter: &ActionFilter,
) -> ActionStatistics {
    let filtered: Vec<&TimelineAction> = actions
        .iter()
        .filter(|a| action_matches(a, filter))
        .collect();
    let total_actions = filtered.len() as u64;

    let mut count_by_category: BTreeMap<ActionCategory, u64> = BTreeMap::new();
    for a in &filtered {
        *count_by_category.entry(a.category()).or_insert(0) += 1;
    }

    let mut attractions: BTreeMap<&str, LocationAgg> = BTreeMap::new();
    let mut restaurants: BTreeMap<&str, u64> = BTreeMap::new();
    let mut areas: BTreeMap<Area, AreaAgg> = BTreeMap::new();
    for a in &filtered {
        match a.category() {
            ActionCategory::Attraction => {
                let agg = attractions.entry(a.location_name.as_str()).or_default();
                agg.count += 1;
                if let Some(wait) = a.wait_minutes {
                    agg.wait_sum += wait as i64;
                    agg.wait_samples += 1;
                }
            }
            ActionCategory::Restaurant => {
                *restaurants.entry(a.location_name.as_str()).or_insert(0) += 1;
            }
            _ => {}
        }
        let agg = areas.entry(a.area).or_default();
        agg.count += 1;
        if let Some(minutes) = a.duration_minutes {
            agg.minutes_sum += minutes as i64;
            agg.minutes_samples += 1;
        }
    }

    let mut top_attractions: Vec<AttractionRank> = attractions
        .into_iter()
        .filter(|(_, agg)| agg.count > 0)
        .map(|(location, agg)| AttractionRank {
            location: location.to_string(),
            count: agg.count,
            average_wait_minutes: if agg.wait_samples > 0 {
                Some(agg.wait_sum as f64 / agg.wait_samples as f64)
            } else {
                None
            },
        })
        .collect();
    top_attractions.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.location.cmp(&b.location)));
    top_attractions.truncate(TOP_RANKING_LIMIT);

    let mut top_restaurants: Vec<RestaurantRank> = restaurants
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(location, count)| RestaurantRank {
            location: location.to_string(),
            count,
        })
        .collect();
    top_restaurants.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.location.cmp(&b.location)));
    top_restaurants.truncate(TOP_RANKING_LIMIT);

    let mut area_distribution: Vec<AreaStat> = areas
        .into_iter()
        .filter(|(_, agg)| agg.count > 0)
        .map(|(area, agg)| AreaStat {
            area,
            count: agg.count,
            percentage: percentage(agg.count, total_actions),
            total_minutes: if agg.minutes_samples > 0 {
                Some(agg.minutes_sum)
            } else {
                None
            },
        })
        .collect();
    area_distribution.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.area.to_string().cmp(&b.area.to_string()))
    });

    let distinct_visits: BTreeSet<&str> =
        filtered.iter().map(|a| a.visit_id.as_str()).collect();
    let average_actions_per_visit = if distinct_visits.is_empty() {
        0.0
    } else {
        total_actions as f64 / distinct_visits.len() as f64
    };

    let total_photos = filtered.iter().map(|a| a.photos.len() as u64).sum();

    ActionStatistics {
        total_actions,
        count_by_category,
        top_attractions,
        top_restaurants,
        area_distribution,
        average_actions_per_visit,
        total_photos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::action::models::{ActionDetails, Photo};
    use crate::journal::types::{Park, PassType, Weather};
    use chrono::{NaiveDate, NaiveDateTime};

    fn visit(id: &str, date: &str, park: Park) -> Visit {
        Visit {
            id: id.to_string(),
            date: date.parse::<NaiveDate>().unwrap(),
            park,
            companion_ids: vec![],
            pass_type: None,
            weather: None,
            start_time: None,
            end_time: None,
            notes: None,
            action_count: None,
            photo_count: None,
        }
    }

    fn companion(id: &str, name: &str) -> Companion {
        Companion {
            id: id.to_string(),
            name: name.to_string(),
            created_at: 0,
        }
    }

    fn attraction(id: &str, visit_id: &str, location: &str, wait: Option<i32>) -> TimelineAction {
        TimelineAction {
            id: id.to_string(),
            visit_id: visit_id.to_string(),
            area: Area::Tomorrowland,
            location_name: location.to_string(),
            time: "2024-01-15T10:00:00".parse::<NaiveDateTime>().unwrap(),
            duration_minutes: None,
            wait_minutes: wait,
            rating: None,
            notes: None,
            photos: vec![],
            details: ActionDetails::Attraction {
                used_priority_pass: false,
            },
        }
    }

    fn restaurant(id: &str, visit_id: &str, location: &str) -> TimelineAction {
        TimelineAction {
            id: id.to_string(),
            visit_id: visit_id.to_string(),
            area: Area::MediterraneanHarbor,
            location_name: location.to_string(),
            time: "2024-01-15T12:00:00".parse::<NaiveDateTime>().unwrap(),
            duration_minutes: Some(60),
            wait_minutes: None,
            rating: None,
            notes: None,
            photos: vec![],
            details: ActionDetails::Restaurant {
                meal_type: None,
                amount: None,
            },
        }
    }

    fn photo(id: &str) -> Photo {
        Photo {
            id: id.to_string(),
            uri: format!("ph://{}", id),
            thumbnail_uri: None,
            width: None,
            height: None,
            taken_at: None,
            caption: None,
        }
    }

    #[test]
    fn park_counts_sum_to_total() {
        let visits = vec![
            visit("v1", "2024-01-15", Park::Land),
            visit("v2", "2024-01-20", Park::Land),
            visit("v3", "2024-02-01", Park::Sea),
        ];
        let stats = compute_visit_statistics(&visits, &[], &VisitFilter::default());

        assert_eq!(stats.total_visits, 3);
        assert_eq!(stats.count_by_park.get(&Park::Land), Some(&2));
        assert_eq!(stats.count_by_park.get(&Park::Sea), Some(&1));
        assert_eq!(stats.count_by_park.values().sum::<u64>(), stats.total_visits);
        assert_eq!(
            stats.visits_by_month,
            vec![
                MonthBucket {
                    month: "2024-01".to_string(),
                    count: 2
                },
                MonthBucket {
                    month: "2024-02".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(
            stats.visits_by_year,
            vec![YearBucket {
                year: 2024,
                count: 3
            }]
        );
    }

    #[test]
    fn single_park_set_has_no_zero_entry_for_the_other() {
        let visits = vec![
            visit("v1", "2024-01-15", Park::Land),
            visit("v2", "2024-01-20", Park::Land),
        ];
        let stats = compute_visit_statistics(&visits, &[], &VisitFilter::default());
        assert_eq!(stats.count_by_park.len(), 1);
        assert!(!stats.count_by_park.contains_key(&Park::Sea));
    }

    #[test]
    fn average_duration_skips_visits_without_both_times() {
        let mut v1 = visit("v1", "2024-01-15", Park::Land);
        v1.start_time = Some("09:00:00".parse().unwrap());
        v1.end_time = Some("19:00:00".parse().unwrap());
        let mut v2 = visit("v2", "2024-01-20", Park::Land);
        v2.start_time = Some("10:00:00".parse().unwrap());
        // v3 记录了倒挂的时间，同样不计入
        let mut v3 = visit("v3", "2024-02-01", Park::Sea);
        v3.start_time = Some("20:00:00".parse().unwrap());
        v3.end_time = Some("09:00:00".parse().unwrap());

        let stats =
            compute_visit_statistics(&[v1, v2, v3], &[], &VisitFilter::default());
        assert_eq!(stats.average_duration_minutes, Some(600.0));
    }

    #[test]
    fn average_duration_is_absent_when_nothing_qualifies() {
        let visits = vec![visit("v1", "2024-01-15", Park::Land)];
        let stats = compute_visit_statistics(&visits, &[], &VisitFilter::default());
        assert_eq!(stats.average_duration_minutes, None);
    }

    #[test]
    fn companion_ranking_orders_by_count_then_name() {
        let mut v1 = visit("v1", "2024-01-15", Park::Land);
        v1.companion_ids = vec!["c1".to_string(), "c2".to_string()];
        let mut v2 = visit("v2", "2024-01-20", Park::Land);
        v2.companion_ids = vec!["c1".to_string(), "c3".to_string()];
        let mut v3 = visit("v3", "2024-02-01", Park::Sea);
        v3.companion_ids = vec!["c3".to_string()];

        let companions = vec![
            companion("c1", "小美"),
            companion("c2", "阿强"),
            companion("c3", "小兰"),
        ];
        let stats =
            compute_visit_statistics(&[v1, v2, v3], &companions, &VisitFilter::default());

        let ranked: Vec<(&str, u64)> = stats
            .companion_ranking
            .iter()
            .map(|r| (r.name.as_str(), r.count))
            .collect();
        // c1 与 c3 都是 2 次，按名称升序：小兰 < 小美
        assert_eq!(ranked, vec![("小兰", 2), ("小美", 2), ("阿强", 1)]);
    }

    #[test]
    fn companion_ranking_skips_dangling_ids() {
        let mut v1 = visit("v1", "2024-01-15", Park::Land);
        v1.companion_ids = vec!["c1".to_string(), "ghost".to_string()];
        let stats = compute_visit_statistics(
            &[v1],
            &[companion("c1", "小美")],
            &VisitFilter::default(),
        );
        assert_eq!(stats.companion_ranking.len(), 1);
        assert_eq!(stats.companion_ranking[0].companion_id, "c1");
    }

    #[test]
    fn duplicated_edge_counts_one_shared_visit() {
        // 导入的快照可能带着重复的伙伴 ID，一次游园只能算一次同行
        let mut v1 = visit("v1", "2024-01-15", Park::Land);
        v1.companion_ids = vec!["c1".to_string(), "c1".to_string()];
        let mut v2 = visit("v2", "2024-01-20", Park::Land);
        v2.companion_ids = vec!["c1".to_string()];

        let stats = compute_visit_statistics(
            &[v1, v2],
            &[companion("c1", "小美")],
            &VisitFilter::default(),
        );
        assert_eq!(stats.companion_ranking.len(), 1);
        assert_eq!(stats.companion_ranking[0].count, 2);
    }

    #[test]
    fn shuffled_input_yields_identical_ranking() {
        let mut visits = Vec::new();
        for (i, companions) in [
            vec!["c1", "c2"],
            vec!["c2"],
            vec!["c1", "c3"],
            vec!["c3"],
            vec!["c1"],
        ]
        .into_iter()
        .enumerate()
        {
            let mut v = visit(&format!("v{}", i), "2024-01-15", Park::Land);
            v.companion_ids = companions.into_iter().map(String::from).collect();
            visits.push(v);
        }
        let companions = vec![
            companion("c1", "桜"),
            companion("c2", "梅"),
            companion("c3", "松"),
        ];

        let forward = compute_visit_statistics(&visits, &companions, &VisitFilter::default());
        visits.reverse();
        let backward = compute_visit_statistics(&visits, &companions, &VisitFilter::default());
        assert_eq!(forward.companion_ranking, backward.companion_ranking);
        assert_eq!(forward.visits_by_month, backward.visits_by_month);
    }

    #[test]
    fn visit_filter_narrows_by_range_park_and_companions() {
        let mut v1 = visit("v1", "2024-01-15", Park::Land);
        v1.companion_ids = vec!["c1".to_string()];
        v1.pass_type = Some(PassType::OneDay);
        let mut v2 = visit("v2", "2024-03-20", Park::Land);
        v2.weather = Some(Weather::Rainy);
        let v3 = visit("v3", "2024-02-01", Park::Sea);

        let visits = vec![v1, v2, v3];

        let range = VisitFilter {
            start_date: Some("2024-01-15".parse().unwrap()),
            end_date: Some("2024-02-01".parse().unwrap()),
            ..VisitFilter::default()
        };
        assert_eq!(compute_visit_statistics(&visits, &[], &range).total_visits, 2);

        let park_only = VisitFilter {
            park: Some(Park::Sea),
            ..VisitFilter::default()
        };
        assert_eq!(
            compute_visit_statistics(&visits, &[], &park_only).total_visits,
            1
        );

        let with_companion = VisitFilter {
            companion_ids: vec!["c1".to_string()],
            ..VisitFilter::default()
        };
        assert_eq!(
            compute_visit_statistics(&visits, &[], &with_companion).total_visits,
            1
        );

        // 空伙伴列表不构成限制
        let empty_companions = VisitFilter {
            companion_ids: vec![],
            ..VisitFilter::default()
        };
        assert_eq!(
            compute_visit_statistics(&visits, &[], &empty_companions).total_visits,
            3
        );
    }

    #[test]
    fn category_counts_sum_to_total_and_omit_zero() {
        let actions = vec![
            attraction("a1", "v1", "ビッグサンダー・マウンテン", Some(40)),
            attraction("a2", "v1", "スプラッシュ・マウンテン", Some(60)),
            restaurant("a3", "v1", "れすとらん北齋"),
        ];
        let stats = compute_action_statistics(&actions, &ActionFilter::default());

        assert_eq!(stats.total_actions, 3);
        assert_eq!(
            stats.count_by_category.values().sum::<u64>(),
            stats.total_actions
        );
        assert_eq!(stats.count_by_category.len(), 2);
        assert!(!stats.count_by_category.contains_key(&ActionCategory::Show));
    }

    #[test]
    fn unrecorded_waits_leave_average_absent() {
        let actions: Vec<TimelineAction> = (0..5)
            .map(|i| attraction(&format!("a{}", i), "v1", "Ride X", None))
            .collect();
        let stats = compute_action_statistics(&actions, &ActionFilter::default());

        assert_eq!(stats.top_attractions.len(), 1);
        assert_eq!(stats.top_attractions[0].count, 5);
        assert_eq!(stats.top_attractions[0].average_wait_minutes, None);
    }

    #[test]
    fn wait_average_uses_only_recorded_samples() {
        let actions = vec![
            attraction("a1", "v1", "Ride Y", Some(30)),
            attraction("a2", "v1", "Ride Y", None),
            attraction("a3", "v1", "Ride Y", Some(60)),
        ];
        let stats = compute_action_statistics(&actions, &ActionFilter::default());
        assert_eq!(stats.top_attractions[0].average_wait_minutes, Some(45.0));
    }

    #[test]
    fn rankings_break_count_ties_by_name() {
        let actions = vec![
            attraction("a1", "v1", "Beta", None),
            attraction("a2", "v1", "Alpha", None),
            attraction("a3", "v1", "Alpha", None),
            attraction("a4", "v1", "Beta", None),
        ];
        let stats = compute_action_statistics(&actions, &ActionFilter::default());
        let order: Vec<&str> = stats
            .top_attractions
            .iter()
            .map(|r| r.location.as_str())
            .collect();
        assert_eq!(order, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn attraction_ranking_is_truncated_to_limit() {
        let mut actions = Vec::new();
        for i in 0..12 {
            // 地点 i 出现 i+1 次，共 12 个地点
            for j in 0..=i {
                actions.push(attraction(
                    &format!("a{}-{}", i, j),
                    "v1",
                    &format!("Ride {:02}", i),
                    None,
                ));
            }
        }
        let stats = compute_action_statistics(&actions, &ActionFilter::default());
        assert_eq!(stats.top_attractions.len(), TOP_RANKING_LIMIT);
        assert_eq!(stats.top_attractions[0].location, "Ride 11");
        assert_eq!(stats.top_attractions[0].count, 12);
    }

    #[test]
    fn area_percentages_sum_to_one_hundred() {
        let mut actions = vec![
            attraction("a1", "v1", "A", None),
            attraction("a2", "v1", "B", None),
            restaurant("a3", "v1", "C"),
        ];
        actions[0].area = Area::Fantasyland;
        actions[1].area = Area::Fantasyland;
        actions[2].area = Area::MediterraneanHarbor;

        let stats = compute_action_statistics(&actions, &ActionFilter::default());
        let sum: f64 = stats.area_distribution.iter().map(|a| a.percentage).sum();
        assert!((sum - 100.0).abs() <= 0.1, "percentage sum was {}", sum);
        assert_eq!(stats.area_distribution[0].area, Area::Fantasyland);
        assert_eq!(stats.area_distribution[0].percentage, 66.7);
    }

    #[test]
    fn empty_input_produces_empty_but_valid_statistics() {
        let stats = compute_action_statistics(&[], &ActionFilter::default());
        assert_eq!(stats.total_actions, 0);
        assert!(stats.count_by_category.is_empty());
        assert!(stats.top_attractions.is_empty());
        assert!(stats.area_distribution.is_empty());
        assert_eq!(stats.average_actions_per_visit, 0.0);
        assert_eq!(stats.total_photos, 0);
    }

    #[test]
    fn average_actions_per_visit_counts_distinct_visits() {
        let actions = vec![
            attraction("a1", "v1", "A", None),
            attraction("a2", "v1", "B", None),
            attraction("a3", "v2", "C", None),
        ];
        let stats = compute_action_statistics(&actions, &ActionFilter::default());
        assert_eq!(stats.average_actions_per_visit, 1.5);
    }

    #[test]
    fn total_minutes_is_absent_without_recorded_durations() {
        let actions = vec![attraction("a1", "v1", "A", None)];
        let stats = compute_action_statistics(&actions, &ActionFilter::default());
        assert_eq!(stats.area_distribution[0].total_minutes, None);

        let with_duration = vec![restaurant("a1", "v1", "C"), restaurant("a2", "v1", "C")];
        let stats = compute_action_statistics(&with_duration, &ActionFilter::default());
        assert_eq!(stats.area_distribution[0].total_minutes, Some(120));
    }

    #[test]
    fn photos_are_counted_across_filtered_actions() {
        let mut a1 = attraction("a1", "v1", "A", None);
        a1.photos = vec![photo("p1"), photo("p2")];
        let mut a2 = restaurant("a2", "v2", "C");
        a2.photos = vec![photo("p3")];

        let stats = compute_action_statistics(&[a1, a2], &ActionFilter::default());
        assert_eq!(stats.total_photos, 3);

        let only_v1 = ActionFilter {
            visit_id: Some("v1".to_string()),
            ..ActionFilter::default()
        };
        let stats = compute_action_statistics(
            &[
                {
                    let mut a = attraction("a1", "v1", "A", None);
                    a.photos = vec![photo("p1"), photo("p2")];
                    a
                },
                {
                    let mut a = restaurant("a2", "v2", "C");
                    a.photos = vec![photo("p3")];
                    a
                },
            ],
            &only_v1,
        );
        assert_eq!(stats.total_photos, 2);
    }

    #[test]
    fn action_filter_constraints_are_anded() {
        let mut a1 = attraction("a1", "v1", "センター・オブ・ジ・アース", Some(90));
        a1.area = Area::MysteriousIsland;
        a1.time = "2024-01-15T11:00:00".parse().unwrap();
        let mut a2 = attraction("a2", "v1", "ソアリン", Some(120));
        a2.area = Area::MediterraneanHarbor;
        a2.time = "2024-05-02T11:00:00".parse().unwrap();
        let a3 = restaurant("a3", "v2", "カスバ・フードコート");

        let actions = vec![a1, a2, a3];

        let filter = ActionFilter {
            category: Some(ActionCategory::Attraction),
            start_date: Some("2024-01-01".parse().unwrap()),
            end_date: Some("2024-01-31".parse().unwrap()),
            ..ActionFilter::default()
        };
        let stats = compute_action_statistics(&actions, &filter);
        assert_eq!(stats.total_actions, 1);
        assert_eq!(stats.top_attractions[0].location, "センター・オブ・ジ・アース");

        let substring = ActionFilter {
            location_contains: Some("フード".to_string()),
            ..ActionFilter::default()
        };
        assert_eq!(compute_action_statistics(&actions, &substring).total_actions, 1);

        // 区分大小写：小写不命中
        let cased = ActionFilter {
            location_contains: Some("soarin".to_string()),
            ..ActionFilter::default()
        };
        assert_eq!(compute_action_statistics(&actions, &cased).total_actions, 0);
    }
}
