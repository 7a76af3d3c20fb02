use abp_compiler::{build_rule_set, parse_rule};
use abp_core::{BuildOptions, FilterError, MatcherEngine, ParseError, RequestContext, RuleSet};

const ENGINES: [MatcherEngine; 2] = [MatcherEngine::Regex, MatcherEngine::RegexSet];

fn build(rules: &[&str], engine: MatcherEngine) -> RuleSet {
    build_rule_set(rules.iter().copied(), &BuildOptions::new().with_engine(engine))
        .expect("rule set should build")
}

fn check(rules: &[&str], blocks: &[&str], allows: &[&str]) {
    let ctx = RequestContext::new();
    for engine in ENGINES {
        let set = build(rules, engine);
        for url in blocks {
            assert!(set.should_block(url, &ctx).unwrap(), "{rules:?} should block {url} ({engine:?})");
        }
        for url in allows {
            assert!(!set.should_block(url, &ctx).unwrap(), "{rules:?} should allow {url} ({engine:?})");
        }
    }
}

#[test]
fn wildcard_and_separator() {
    check(
        &["/banner/*/img^"],
        &[
            "http://example.com/banner/foo/img",
            "http://example.com/banner/foo/bar/img?param",
            "http://example.com/banner//img/foo",
        ],
        &[
            "http://example.com/banner/img",
            "http://example.com/banner/foo/imgraph",
            "http://example.com/banner/foo/img.gif",
        ],
    );
}

#[test]
fn hostname_anchor() {
    check(
        &["||ads.example.com^"],
        &[
            "http://ads.example.com/foo.gif",
            "http://server1.ads.example.com/foo.gif",
            "https://ads.example.com:8000/",
        ],
        &[
            "http://ads.example.com.ua/foo.gif",
            "http://example.com/redirect/http://ads.example.com/",
        ],
    );
    check(
        &["||example.com/banner.gif"],
        &[
            "http://example.com/banner.gif",
            "https://example.com/banner.gif",
            "http://www.example.com/banner.gif",
        ],
        &[
            "http://badexample.com/banner.gif",
            "http://gooddomain.example/analyze?http://example.com/banner.gif",
        ],
    );
}

#[test]
fn address_anchors() {
    check(
        &["|http://example.com/|"],
        &["http://example.com/"],
        &[
            "http://example.com/foo.gif",
            "http://example.info/redirect/http://example.com/",
        ],
    );
    check(
        &["swf|"],
        &["http://example.com/annoyingflash.swf"],
        &["http://example.com/swf/index.html"],
    );
    check(
        &["|http://baddomain.example/"],
        &["http://baddomain.example/banner.gif"],
        &["http://gooddomain.example/analyze?http://baddomain.example"],
    );
}

#[test]
fn separator_matches_end_and_punctuation() {
    check(
        &["http://example.com^"],
        &["http://example.com/", "http://example.com:8000/ "],
        &["http://example.com.ar/"],
    );
    let url = "http://example.com:8000/foo.bar?a=12&b=%D1%82%D0%B5%D1%81%D1%82";
    check(&["^example.com^"], &[url], &[]);
    check(&["^%D1%82%D0%B5%D1%81%D1%82^"], &[url], &[]);
    check(&["^foo.bar^"], &[url], &[]);
}

#[test]
fn exceptions_win_regardless_of_order() {
    let blocks = ["http://example.com/advert.html"];
    let allows = ["http://example.com/advice.html"];
    check(&["adv", "@@advice."], &blocks, &allows);
    check(&["@@advice.", "adv"], &blocks, &allows);
    check(
        &["@@|http://example.com", "@@advice.", "adv", "!foo"],
        &["http://examples.com/advert.html"],
        &[
            "http://example.com/advice.html",
            "http://example.com/advert.html",
            "http://examples.com/advice.html",
            "http://examples.com/#!foo",
        ],
    );
}

#[test]
fn regex_literal_rules() {
    check(&[r"/banner\d+/"], &["http://example.com/banner123"], &["http://example.com/banners"]);
}

#[test]
fn matching_is_case_insensitive() {
    check(&["||ADS.example.com^"], &["HTTP://ads.EXAMPLE.com/x.gif"], &[]);
}

#[test]
fn option_gating() {
    let set = build(&["||example.com^$third-party"], MatcherEngine::Regex);
    let url = "http://example.com/script.js";

    let first_party = RequestContext::new().with_option("third-party", false);
    let third_party = RequestContext::new().with_option("third-party", true);
    assert!(!set.should_block(url, &first_party).unwrap());
    assert!(set.should_block(url, &third_party).unwrap());
    // Without the option in context the rule is skipped.
    assert!(!set.should_block(url, &RequestContext::new()).unwrap());

    let rule = parse_rule("||example.com^$third-party").unwrap();
    assert!(!rule.matches(url, &first_party).unwrap());
    assert!(rule.matches(url, &third_party).unwrap());
}

#[test]
fn domain_option_specificity() {
    let set = build(&["ads.js$domain=~foo.example.com|example.com"], MatcherEngine::Regex);
    let url = "http://cdn.net/ads.js";
    let on = |domain: &str| RequestContext::new().with_domain(domain);

    assert!(set.should_block(url, &on("example.com")).unwrap());
    assert!(set.should_block(url, &on("www.example.com")).unwrap());
    assert!(!set.should_block(url, &on("foo.example.com")).unwrap());
    assert!(!set.should_block(url, &on("www.foo.example.com")).unwrap());
    assert!(!set.should_block(url, &on("example.org")).unwrap());
}

#[test]
fn domain_list_with_boolean_options() {
    let set = build(
        &["||ads.net^$script,domain=site.com,news.com,third-party"],
        MatcherEngine::Regex,
    );
    let url = "http://ads.net/a.js";
    let ctx = |domain: &str, script: bool| {
        RequestContext::new()
            .with_domain(domain)
            .with_option("script", script)
            .with_option("third-party", true)
    };

    assert!(set.should_block(url, &ctx("site.com", true)).unwrap());
    assert!(set.should_block(url, &ctx("www.news.com", true)).unwrap());
    assert!(!set.should_block(url, &ctx("site.com", false)).unwrap());
    assert!(!set.should_block(url, &ctx("unrelated.com", true)).unwrap());
}

#[test]
fn unsupported_options_drop_exceptions() {
    let rules = ["||ads.example.com^", "@@||ads.example.com^$~third-party"];
    let ctx = RequestContext::new().with_option("third-party", false);
    let url = "http://ads.example.com/banner.gif";

    let full = build_rule_set(rules, &BuildOptions::default()).unwrap();
    assert!(!full.should_block(url, &ctx).unwrap());

    let none = build_rule_set(rules, &BuildOptions::new().with_supported_options(Vec::<String>::new()))
        .unwrap();
    assert_eq!(none.len(), 1);
    assert!(none.should_block(url, &ctx).unwrap());
}

#[test]
fn exception_rule_alone_never_blocks() {
    let ctx = RequestContext::new().with_option("script", true);
    for text in ["@@||ads.example.com^", "@@ads$script", "@@swf|"] {
        let rule = parse_rule(text).unwrap();
        let set = build_rule_set([rule.clone()], &BuildOptions::default()).unwrap();
        for url in ["http://ads.example.com/x.swf", "http://example.com/ads"] {
            if rule.matches(url, &ctx).unwrap() {
                assert!(!set.should_block(url, &ctx).unwrap());
            }
        }
    }
}

#[test]
fn rebuilding_is_deterministic() {
    let rules = [
        "||ads.example.com^",
        "@@||ads.example.com/ok^",
        "banner$third-party",
        "@@banner$domain=good.com",
        "swf|",
    ];
    let urls = [
        "http://ads.example.com/a.gif",
        "http://ads.example.com/ok/a.gif",
        "http://cdn.net/banner.png",
        "http://cdn.net/flash.swf",
        "http://cdn.net/index.html",
    ];
    let contexts = [
        RequestContext::new(),
        RequestContext::new().with_option("third-party", true).with_domain("good.com"),
        RequestContext::new().with_option("third-party", true).with_domain("bad.com"),
    ];

    let first = build(&rules, MatcherEngine::Regex);
    let second = build(&rules, MatcherEngine::Regex);
    for url in urls {
        for ctx in &contexts {
            assert_eq!(
                first.should_block(url, ctx).unwrap(),
                second.should_block(url, ctx).unwrap()
            );
        }
    }
}

#[test]
fn match_case_only_rules_stay_advanced() {
    let set = build(&["banner$match-case"], MatcherEngine::Regex);
    let stats = set.stats();
    assert_eq!(stats.basic_blacklist, 0);
    assert_eq!(stats.advanced_blacklist, 1);
    assert!(set.should_block("http://example.com/BANNER", &RequestContext::new()).unwrap());
}

#[test]
fn empty_regex_literal_fails_the_build() {
    let result = build_rule_set(["/*/"], &BuildOptions::default());
    assert!(matches!(
        result,
        Err(FilterError::Parse {
            source: ParseError::EmptyRegex,
            ..
        })
    ));
}

#[test]
fn tiny_memory_limit_fails_the_build() {
    let rules: Vec<String> = (0..500).map(|i| format!("||ads{i}.example.com^*banner{i}")).collect();
    let options = BuildOptions::new().with_memory_limit(512);
    let result = build_rule_set(&rules, &options);
    assert!(matches!(result, Err(FilterError::EngineConstruction(_))));
}

#[test]
fn empty_option_token_never_blocks() {
    let url = "http://x.com/ads.js";
    let contexts = [
        RequestContext::new(),
        RequestContext::new().with_option("third-party", true),
    ];
    for engine in ENGINES {
        for rules in [["ads$"], ["ads$,third-party"]] {
            let set = build(&rules, engine);
            assert!(set.is_empty(), "{rules:?}");
            for ctx in &contexts {
                assert!(!set.should_block(url, ctx).unwrap(), "{rules:?} ({engine:?})");
            }
        }
    }
}

#[test]
fn regex_literal_flags_do_not_leak_into_other_rules() {
    check(
        &["/(?-i)Foo/", "banner"],
        &["http://x.com/BANNER", "http://x.com/Foo"],
        &["http://x.com/foo"],
    );
}
