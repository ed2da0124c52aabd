use criterion::{Criterion, criterion_group, criterion_main};
use lustro::{Options, Registry};

const JS_SAMPLE: &str = r#"// Finds the first matching item
function find(items, re) {
  for (var i = 0; i &lt; items.length; i++) {
    if (/^\s*$/.test(items[i])) continue;
    if (re.test(items[i])) return items[i];
  }
  return null;
}
"#;

const HTML_SAMPLE: &str = r#"&lt;div class="box" onclick="toggle(this)"&gt;
  &lt;style&gt;.box { color: #fff; margin: 0 auto; }&lt;/style&gt;
  &lt;script&gt;var x = 1 / 2; var re = /a+b/g;&lt;/script&gt;
  &lt;!-- a comment --&gt;
&lt;/div&gt;
"#;

fn highlight_js_benchmark(c: &mut Criterion) {
    let registry = Registry::with_builtin_languages().expect("Failed to load builtin languages");
    let content = JS_SAMPLE.repeat(200);
    let options = Options::default();

    c.bench_function("highlight js", |b| {
        b.iter(|| {
            let result = registry.prettify(&content, Some("js"), &options).unwrap();
            std::hint::black_box(result);
        })
    });
}

fn highlight_html_benchmark(c: &mut Criterion) {
    let registry = Registry::with_builtin_languages().expect("Failed to load builtin languages");
    let content = HTML_SAMPLE.repeat(100);
    let options = Options::default().line_numbers(Some(1));

    c.bench_function("highlight html with embedded languages", |b| {
        b.iter(|| {
            let result = registry.prettify(&content, Some("html"), &options).unwrap();
            std::hint::black_box(result);
        })
    });
}

fn builtin_languages_benchmark(c: &mut Criterion) {
    c.bench_function("compile builtin languages", |b| {
        b.iter(|| {
            let registry = Registry::with_builtin_languages().unwrap();
            std::hint::black_box(registry);
        })
    });
}

criterion_group!(
    benches,
    highlight_js_benchmark,
    highlight_html_benchmark,
    builtin_languages_benchmark
);
criterion_main!(benches);
