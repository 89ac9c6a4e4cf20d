//! Canned scripts offered by the example picker.
//!
//! They go through the same normalizer and executor as user text, so they are
//! written the way users paste them: fixed heights and the literal
//! `"container"` id included.

/// One named example script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub name: &'static str,
    pub title: &'static str,
    pub script: &'static str,
}

pub const BAR: Sample = Sample {
    name: "bar",
    title: "Basic bar chart",
    script: r##"// Games sold per genre
const data = [
    #{ genre: "Sports", sold: 275 },
    #{ genre: "Strategy", sold: 115 },
    #{ genre: "Action", sold: 120 },
    #{ genre: "Shooter", sold: 350 },
    #{ genre: "Other", sold: 150 }
];

const chart = Chart(#{
    container: "container",
    autoFit: true,
    height: 400
});

chart.data(data);
chart.title("Games sold by genre");

chart
    .interval()
    .encode("x", "genre")
    .encode("y", "sold")
    .encode("color", "genre");

chart.render();

return chart;
"##,
};

pub const LINE: Sample = Sample {
    name: "line",
    title: "Line chart",
    script: r##"// Yearly trend with point markers
const data = [
    #{ year: "1991", value: 3 },
    #{ year: "1992", value: 4 },
    #{ year: "1993", value: 3.5 },
    #{ year: "1994", value: 5 },
    #{ year: "1995", value: 4.9 },
    #{ year: "1996", value: 6 },
    #{ year: "1997", value: 7 },
    #{ year: "1998", value: 9 },
    #{ year: "1999", value: 13 }
];

const chart = Chart(#{
    container: "container",
    autoFit: true,
    height: 400
});

chart.data(data);

chart
    .line()
    .encode("x", "year")
    .encode("y", "value")
    .style("stroke", "#1890ff")
    .style("lineWidth", 2);

chart
    .point()
    .encode("x", "year")
    .encode("y", "value")
    .style("fill", "#1890ff")
    .style("size", 3);

chart.render();

return chart;
"##,
};

pub const PIE: Sample = Sample {
    name: "pie",
    title: "Pie chart",
    script: r##"// Share per type on a theta coordinate
const data = [
    #{ kind: "a", value: 27 },
    #{ kind: "b", value: 25 },
    #{ kind: "c", value: 18 },
    #{ kind: "d", value: 15 },
    #{ kind: "e", value: 10 },
    #{ kind: "f", value: 5 }
];

const chart = Chart(#{
    container: "container",
    autoFit: true,
    height: 400
});

chart.data(data);
chart.coordinate(#{ "type": "theta", outerRadius: 0.8 });

chart
    .interval()
    .transform(#{ "type": "stackY" })
    .encode("y", "value")
    .encode("color", "kind")
    .legend("color", #{ position: "bottom" })
    .label(#{ position: "outside", text: "kind" })
    .tooltip(#{ name: "kind", value: "value" });

chart.render();

return chart;
"##,
};

pub const SCATTER: Sample = Sample {
    name: "scatter",
    title: "Scatter plot",
    script: r##"// Linear-ish relationship
let data = [];
for x in 1..=10 {
    data.push(#{ x: x, y: 2.8 + 1.3 * x });
}

const chart = Chart(#{
    container: "container",
    autoFit: true,
    height: 400
});

chart.data(data);

chart
    .point()
    .encode("x", "x")
    .encode("y", "y")
    .encode("size", 4)
    .style("fill", "#5B8FF9")
    .style("fillOpacity", 0.8);

chart.render();

return chart;
"##,
};

/// Every sample, in picker order.
pub static SAMPLES: [Sample; 4] = [BAR, LINE, PIE, SCATTER];

/// Looks a sample up by `name` or display title, ignoring ASCII case.
#[must_use]
pub fn find(name: &str) -> Option<&'static Sample> {
    let name = name.trim();
    SAMPLES.iter().find(|sample| {
        sample.name.eq_ignore_ascii_case(name) || sample.title.eq_ignore_ascii_case(name)
    })
}

#[must_use]
pub fn names() -> Vec<&'static str> {
    SAMPLES.iter().map(|sample| sample.name).collect()
}
