//! `DieselVideoRepository` against embedded PostgreSQL: hashtag
//! connect-or-create, feed filters and the aggregate queries.

#[path = "support/pg_embed.rs"]
mod pg_embed;

use chrono::{DateTime, Duration, Utc};
use clipstream::domain::ports::{UserRepository, VideoPersistenceError, VideoRepository};
use clipstream::domain::{
    Category, Email, FeedFilter, HashtagName, NewVideo, StoredUser, User, UserId, Username,
    VideoId,
};
use clipstream::outbound::persistence::{DieselUserRepository, DieselVideoRepository};
use pg_embed::{PgWorld, pg_world};
use rstest::{fixture, rstest};

struct Seeded {
    world: PgWorld,
    repo: DieselVideoRepository,
    owner: UserId,
    base: DateTime<Utc>,
}

impl Seeded {
    fn video(&self, offset: i64, category: Option<&str>, tags: &[&str]) -> NewVideo {
        NewVideo {
            id: VideoId::random(),
            owner: self.owner,
            url: format!("https://cdn.invalid/{offset}.mp4"),
            description: None,
            category: Category::parse_optional(category).expect("category"),
            hashtags: HashtagName::parse_list(tags.iter().copied()).expect("hashtags"),
            created_at: self.base + Duration::seconds(offset),
        }
    }

    fn insert(&self, offset: i64, category: Option<&str>, tags: &[&str]) -> VideoId {
        let video = self.video(offset, category, tags);
        self.world
            .block_on(self.repo.insert_with_hashtags(&video))
            .expect("insert video");
        video.id
    }
}

#[fixture]
fn seeded() -> Option<Seeded> {
    let world = pg_world()?;
    let owner = StoredUser {
        user: User {
            id: UserId::random(),
            email: Email::new("ada@example.com").expect("email"),
            username: Username::new("ada_l").expect("username"),
            image: None,
            created_at: Utc::now(),
        },
        password_hash: "$argon2id$stub".to_owned(),
    };
    world
        .block_on(DieselUserRepository::new(world.pool.clone()).insert(&owner))
        .expect("insert owner");
    let repo = DieselVideoRepository::new(world.pool.clone());
    Some(Seeded {
        world,
        repo,
        owner: owner.user.id,
        base: Utc::now() - Duration::hours(1),
    })
}

#[rstest]
fn feed_filters_by_normalised_hashtag_and_category(seeded: Option<Seeded>) {
    let Some(seeded) = seeded else { return };
    let first = seeded.insert(0, Some("dance"), &["#Fun", "dance"]);
    let second = seeded.insert(1, Some("comedy"), &["fun"]);
    let third = seeded.insert(2, None, &["cats"]);

    let all = seeded
        .world
        .block_on(seeded.repo.list_feed(&FeedFilter::default(), 20))
        .expect("feed");
    let ids: Vec<VideoId> = all.iter().map(|entry| entry.video.id).collect();
    assert_eq!(ids, vec![third, second, first]);
    assert!(all.iter().all(|entry| entry.user.id == seeded.owner));
    let tags: Vec<&str> = all[2].hashtags.iter().map(AsRef::as_ref).collect();
    assert_eq!(tags, vec!["dance", "fun"]);

    let tagged = FeedFilter {
        category: None,
        hashtag: Some(HashtagName::new("#FUN").expect("hashtag")),
    };
    let page = seeded
        .world
        .block_on(seeded.repo.list_feed(&tagged, 20))
        .expect("tagged feed");
    let ids: Vec<VideoId> = page.iter().map(|entry| entry.video.id).collect();
    assert_eq!(ids, vec![second, first]);

    let both = FeedFilter {
        category: Category::parse_optional(Some("comedy")).expect("category"),
        ..tagged
    };
    let page = seeded
        .world
        .block_on(seeded.repo.list_feed(&both, 20))
        .expect("filtered feed");
    let ids: Vec<VideoId> = page.iter().map(|entry| entry.video.id).collect();
    assert_eq!(ids, vec![second]);
}

#[rstest]
fn feed_honours_the_limit(seeded: Option<Seeded>) {
    let Some(seeded) = seeded else { return };
    for offset in 0..5 {
        seeded.insert(offset, None, &[]);
    }
    let page = seeded
        .world
        .block_on(seeded.repo.list_feed(&FeedFilter::default(), 3))
        .expect("feed");
    assert_eq!(page.len(), 3);
    assert!(
        page.windows(2)
            .all(|pair| pair[0].video.created_at >= pair[1].video.created_at)
    );
}

#[rstest]
fn categories_skip_null_and_rank_by_count(seeded: Option<Seeded>) {
    let Some(seeded) = seeded else { return };
    seeded.insert(0, Some("dance"), &[]);
    seeded.insert(1, Some("dance"), &[]);
    seeded.insert(2, Some("comedy"), &[]);
    seeded.insert(3, Some("art"), &[]);
    seeded.insert(4, None, &[]);

    let rows = seeded
        .world
        .block_on(seeded.repo.category_counts())
        .expect("categories");
    let rows: Vec<(&str, i64)> = rows
        .iter()
        .map(|row| (row.category.as_str(), row.count))
        .collect();
    assert_eq!(rows, vec![("dance", 2), ("art", 1), ("comedy", 1)]);
}

#[rstest]
fn trending_ranks_by_video_count_and_caps(seeded: Option<Seeded>) {
    let Some(seeded) = seeded else { return };
    let names: Vec<String> = (0..12).map(|index| format!("tag{index:02}")).collect();
    // tag00 lands on three videos, tag01 on two, the rest on one each.
    seeded.insert(0, None, &["tag00", "tag01"]);
    seeded.insert(1, None, &["tag00", "tag01"]);
    seeded.insert(2, None, &["tag00"]);
    for (offset, name) in (3_i64..).zip(names.iter().skip(2)) {
        seeded.insert(offset, None, &[name.as_str()]);
    }

    let trending = seeded
        .world
        .block_on(seeded.repo.trending_hashtags(10))
        .expect("trending");
    assert_eq!(trending.len(), 10);
    let ranked: Vec<(&str, i64)> = trending
        .iter()
        .map(|row| (row.name.as_ref(), row.video_count))
        .collect();
    assert_eq!(ranked[0], ("tag00", 3));
    assert_eq!(ranked[1], ("tag01", 2));
    assert_eq!(ranked[2], ("tag02", 1));
    assert_eq!(ranked[9], ("tag09", 1));
}

#[rstest]
fn shared_hashtags_are_stored_once(seeded: Option<Seeded>) {
    let Some(seeded) = seeded else { return };
    seeded.insert(0, None, &["fun"]);
    seeded.insert(1, None, &["#Fun"]);

    let trending = seeded
        .world
        .block_on(seeded.repo.trending_hashtags(10))
        .expect("trending");
    assert_eq!(trending.len(), 1);
    assert_eq!(trending[0].video_count, 2);
}

#[rstest]
fn failed_hashtag_links_roll_the_video_back(seeded: Option<Seeded>) {
    let Some(seeded) = seeded else { return };
    seeded.world.execute("DROP TABLE video_hashtags");

    let video = seeded.video(0, Some("dance"), &["fun"]);
    let err = seeded
        .world
        .block_on(seeded.repo.insert_with_hashtags(&video))
        .expect_err("link table missing");
    assert!(matches!(err, VideoPersistenceError::Query { .. }));

    let exists = seeded
        .world
        .block_on(seeded.repo.exists(&video.id))
        .expect("exists");
    assert!(!exists);
    let categories = seeded
        .world
        .block_on(seeded.repo.category_counts())
        .expect("categories");
    assert!(categories.is_empty());
}

#[rstest]
fn videos_need_an_existing_owner(seeded: Option<Seeded>) {
    let Some(seeded) = seeded else { return };
    let mut orphan = seeded.video(0, None, &[]);
    orphan.owner = UserId::random();

    let err = seeded
        .world
        .block_on(seeded.repo.insert_with_hashtags(&orphan))
        .expect_err("owner missing");
    assert!(matches!(err, VideoPersistenceError::Query { .. }));
}
