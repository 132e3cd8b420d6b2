use crate::counter::{GUEST_NOTICE, SYNC_DEBOUNCE};

pub fn render_index() -> String {
    INDEX_HTML
        .replace("{{DEBOUNCE_MS}}", &SYNC_DEBOUNCE.as_millis().to_string())
        .replace("{{GUEST_NOTICE}}", GUEST_NOTICE)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Quack Counter</title>
  <style>
    :root {
      --bg-1: #fffbea;
      --bg-2: #ffe7b8;
      --ink: #1f2933;
      --accent: #d97706;
      --accent-2: #ca8a04;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(120, 80, 10, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg-1), var(--bg-2));
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(520px, 100%);
      display: grid;
      gap: 24px;
      justify-items: center;
    }

    h1 {
      margin: 0;
      font-size: 3.75rem;
      font-weight: 700;
      letter-spacing: 0.08em;
      text-transform: uppercase;
      text-align: center;
    }

    #quack-btn {
      border: 2px solid var(--ink);
      background: transparent;
      padding: 4px 16px;
      font: inherit;
      font-size: 0.6em;
      font-weight: 700;
      cursor: pointer;
      transition: background 200ms ease, color 200ms ease;
    }

    #quack-btn:hover {
      background: var(--ink);
      color: white;
    }

    .panel {
      width: 100%;
      display: grid;
      grid-template-columns: 1fr 1fr;
      gap: 16px;
      background: var(--card);
      border-radius: 12px;
      box-shadow: var(--shadow);
      padding: 24px;
    }

    .stat {
      text-align: center;
    }

    .stat .label {
      display: block;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--accent);
    }

    .stat .value {
      display: block;
      font-size: 2.2rem;
      font-weight: 700;
      color: var(--accent-2);
    }

    .notice {
      width: 100%;
      display: none;
      align-items: center;
      justify-content: space-between;
      border-radius: 10px;
      padding: 12px 16px;
      font-size: 0.9rem;
    }

    .notice[data-type="info"] {
      display: flex;
      background: #dbeafe;
      color: #1d4ed8;
    }

    .notice[data-type="error"] {
      display: flex;
      background: #fee2e2;
      color: #b91c1c;
    }

    .notice button {
      border: none;
      background: transparent;
      color: inherit;
      font-weight: 600;
      cursor: pointer;
    }

    .token {
      width: 100%;
      display: flex;
      gap: 8px;
    }

    .token input {
      flex: 1;
      padding: 8px 10px;
      border-radius: 8px;
      border: 1px solid rgba(31, 41, 51, 0.2);
    }
  </style>
</head>
<body>
  <main class="app">
    <h1>You can <button id="quack-btn" type="button">Quack</button> &#x1F986;</h1>

    <section class="panel">
      <div class="stat">
        <span class="label">Total Quacks</span>
        <span id="total" class="value">0</span>
      </div>
      <div class="stat">
        <span class="label">Time Without Quacks</span>
        <span id="since" class="value">Never</span>
      </div>
    </section>

    <div class="notice" id="notice">
      <span id="notice-text"></span>
      <button id="retry-btn" type="button">Retry</button>
    </div>

    <form class="token" id="token-form">
      <input id="token" type="password" placeholder="Access token (leave empty for demo mode)" />
      <button type="submit">Save</button>
    </form>
  </main>

  <script>
    const DEBOUNCE_MS = {{DEBOUNCE_MS}};
    const GUEST_NOTICE = '{{GUEST_NOTICE}}';

    const totalEl = document.getElementById('total');
    const sinceEl = document.getElementById('since');
    const noticeEl = document.getElementById('notice');
    const noticeTextEl = document.getElementById('notice-text');
    const retryBtn = document.getElementById('retry-btn');
    const tokenInput = document.getElementById('token');

    let stats = { total_quacks: 0, last_quack_at: null };
    let pending = 0;
    let syncing = false;
    let timer = null;

    tokenInput.value = localStorage.getItem('quack-token') || '';
    const credential = () => localStorage.getItem('quack-token');

    const timeWithout = (value) => {
      if (!value) {
        return 'Never';
      }
      const seconds = Math.floor((Date.now() - new Date(value).getTime()) / 1000);
      if (seconds < 60) {
        return 'Just now';
      }
      const [amount, unit] = seconds < 3600
        ? [Math.floor(seconds / 60), 'minute']
        : seconds < 86400
          ? [Math.floor(seconds / 3600), 'hour']
          : [Math.floor(seconds / 86400), 'day'];
      return `${amount} ${unit}${amount > 1 ? 's' : ''}`;
    };

    const render = () => {
      totalEl.textContent = stats.total_quacks;
      sinceEl.textContent = timeWithout(stats.last_quack_at);
    };

    const setNotice = (message, type) => {
      noticeTextEl.textContent = message || '';
      noticeEl.dataset.type = message ? type : '';
      retryBtn.style.display = type === 'error' ? '' : 'none';
    };

    const sync = async () => {
      while (pending > 0 && !syncing) {
        const amount = pending;
        pending = 0;
        syncing = true;
        try {
          const token = credential();
          if (!token) {
            setNotice(GUEST_NOTICE, 'info');
            continue;
          }
          const res = await fetch('/api/quack', {
            method: 'POST',
            headers: {
              'content-type': 'application/json',
              authorization: `Bearer ${token}`
            },
            body: JSON.stringify({ increment: amount })
          });
          const body = await res.json().catch(() => null);
          if (!res.ok || !body || typeof body.total_quacks !== 'number') {
            throw new Error((body && body.error) || 'Failed to sync quacks');
          }
          stats = body;
          setNotice('', '');
        } catch (err) {
          setNotice(err.message, 'error');
        } finally {
          syncing = false;
          render();
        }
      }
    };

    const quack = () => {
      stats = {
        ...stats,
        total_quacks: stats.total_quacks + 1,
        last_quack_at: new Date().toISOString()
      };
      pending += 1;
      if (noticeEl.dataset.type === 'error') {
        setNotice('', '');
      }
      render();
      clearTimeout(timer);
      timer = setTimeout(sync, DEBOUNCE_MS);
    };

    const load = async () => {
      const token = credential();
      if (!token) {
        setNotice(GUEST_NOTICE, 'info');
        return;
      }
      const res = await fetch('/api/quack', { headers: { authorization: `Bearer ${token}` } });
      if (res.ok) {
        stats = await res.json();
        render();
      }
    };

    document.getElementById('quack-btn').addEventListener('click', quack);
    retryBtn.addEventListener('click', () => sync());
    document.getElementById('token-form').addEventListener('submit', (event) => {
      event.preventDefault();
      localStorage.setItem('quack-token', tokenInput.value.trim());
      load().catch((err) => setNotice(err.message, 'error'));
    });

    setInterval(render, 60000);
    render();
    load().catch((err) => setNotice(err.message, 'error'));
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_fills_placeholders() {
        let html = render_index();
        assert!(html.contains("const DEBOUNCE_MS = 500;"));
        assert!(html.contains(GUEST_NOTICE));
        assert!(!html.contains("{{"));
    }
}
